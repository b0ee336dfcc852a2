//! # arbiter-core
//!
//! Adaptive deliberation controller for evaluating natural-language
//! explanations. The controller routes each explanation through one of
//! three evaluation strategies of increasing cost, selected by how much
//! three independent scoring perspectives disagree about it.
//!
//! Control flow:
//!
//! ```text
//! input text -> Complexity Estimator -> Mode Dispatcher -> Strategy -> score
//! ```
//!
//! ## Key Guarantees
//!
//! 1. **Injected scoring**: every model-shaped call goes through a
//!    [`ScoreProvider`] passed in by the caller; there is no global scoring
//!    state to patch.
//! 2. **Deterministic**: same input and same (deterministic) provider always
//!    produce the same output.
//! 3. **No silent defaults**: a failed or out-of-range scoring call aborts
//!    the evaluation with an error.
//! 4. **Configurable routing**: thresholds, round counts, and penalties are
//!    config values, not constants.
//!
//! ## Example
//!
//! ```rust
//! use arbiter_core::{evaluate, ControllerConfig, SimulatedScorer};
//!
//! let provider = SimulatedScorer::with_seed(42);
//! let result = evaluate(
//!     "The model chose 'cat' because the image contained a cat.",
//!     &provider,
//!     &ControllerConfig::default(),
//! ).unwrap();
//! println!("{} via {}", result.score, result.mode);
//! ```

pub mod config;
pub mod dispatch;
pub mod estimator;
pub mod prompts;
pub mod provider;
pub mod strategies;
pub mod text;
pub mod types;

pub use config::{ConfigError, ControllerConfig, DispatchThresholds};
pub use dispatch::dispatch;
pub use estimator::{ComplexityAssessment, ComplexityEstimator};
pub use provider::{
    validate_assessment, FixedScorer, PromptContext, ScoreError, ScoreProvider, SimulatedScorer,
};
pub use strategies::{
    fib_scope, reconcile, refine, strategy_for, DeliberationStrategy, StrategyOutcome,
};
pub use text::InputError;
pub use types::{
    Assessment, ComplexityScore, DeliberationMode, DeliberationResult, Role, RoundRecord,
    ScoreSet, Stance, SCORE_MAX, SCORE_MIN,
};

use chrono::Utc;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by a top-level evaluation. Nothing is swallowed.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("scoring failure: {0}")]
    Scoring(#[from] ScoreError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// The adaptive deliberation controller.
///
/// Owns a validated config; the scoring provider is injected per
/// evaluation.
pub struct Controller {
    config: ControllerConfig,
}

impl Controller {
    /// Build a controller, rejecting invalid configuration up front.
    pub fn new(config: ControllerConfig) -> Result<Self, EvaluationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Evaluate an explanation end to end.
    ///
    /// Validates the input, assesses complexity from perspective
    /// disagreement, dispatches to a deliberation tier, and runs it.
    pub fn evaluate(
        &self,
        explanation: &str,
        provider: &dyn ScoreProvider,
    ) -> Result<DeliberationResult, EvaluationError> {
        text::validate(explanation)?;

        let estimator = ComplexityEstimator::new(self.config.variance_gain);
        let assessment = estimator.estimate(explanation, provider)?;

        let mode = dispatch(assessment.complexity, &self.config.thresholds);
        let strategy = strategy_for(mode, &self.config);
        let outcome = strategy.evaluate(explanation, &assessment.baseline, provider)?;

        info!(mode = %mode, score = outcome.score, "deliberation complete");
        Ok(DeliberationResult {
            score: outcome.score,
            mode,
            complexity: assessment.complexity,
            variance: assessment.variance,
            rounds: outcome.rounds,
            evaluated_at: Utc::now(),
        })
    }
}

/// One-shot evaluation with an explicit config.
pub fn evaluate(
    explanation: &str,
    provider: &dyn ScoreProvider,
    config: &ControllerConfig,
) -> Result<DeliberationResult, EvaluationError> {
    Controller::new(config.clone())?.evaluate(explanation, provider)
}
