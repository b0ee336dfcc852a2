//! # arbiter-runtime
//!
//! Async evaluation runtime for the arbiter deliberation controller.
//!
//! `arbiter-core` runs everything sequentially and is the semantic source
//! of truth. This crate adds what matters once scoring calls have real
//! latency and cost:
//!
//! - **Scatter/gather**: the three perspective queries of each round are
//!   independent, so they run concurrently and rejoin before aggregation.
//!   Rounds stay sequential.
//! - **Resilience**: per-call timeout, opt-in retry with backoff for
//!   transient failures, and a hard budget on scoring calls per
//!   evaluation.
//! - **Caching**: repeated (role, prompt) pairs can be served from memory.
//!
//! Retry is a policy at the provider boundary, documented as such — the
//! core contract stays retry-free and nothing here substitutes defaults
//! for failed calls.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use arbiter_core::SimulatedScorer;
//! use arbiter_runtime::{DeliberationOrchestrator, RuntimeConfig, SyncBridge};
//!
//! let provider = Arc::new(SyncBridge::new(SimulatedScorer::new(), "simulated"));
//! let orchestrator = DeliberationOrchestrator::new(provider, RuntimeConfig::default())?;
//! let outcome = orchestrator.evaluate("The model chose 'cat'...").await?;
//! println!("{} ({} calls)", outcome.result.score, outcome.usage.scoring_calls);
//! ```

pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod provider;
pub mod resilience;

pub use cache::{AssessmentCache, CacheKey, CachedScorer};
pub use config::{CacheSettings, RetrySettings, RuntimeConfig};
pub use orchestrator::{DeliberationOrchestrator, RuntimeError, RuntimeResult};
pub use provider::{AsyncScoreProvider, SyncBridge};
pub use resilience::{CallBudget, CallTracker, CallUsage, ResilientScorer, RetryPolicy};
