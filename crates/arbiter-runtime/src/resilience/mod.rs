//! Resilience at the scoring boundary.
//!
//! - Call budget so a misconfigured round count cannot run away
//! - Timeout and retry with backoff around the provider
//!
//! Retry is a boundary policy, not a core guarantee: the core contract has
//! no retries, and these wrappers are opt-in.

mod budget;
mod retry;

pub use budget::{CallBudget, CallTracker, CallUsage};
pub use retry::{ResilientScorer, RetryPolicy};
