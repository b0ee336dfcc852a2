//! Deliberation strategies.
//!
//! Three tiers of increasing cost behind one trait. The dispatcher picks a
//! tier; [`strategy_for`] builds it from the controller config. Strategies
//! never query beyond their contract: single-pass issues no new calls at
//! all, iterative issues three per round, adversarial issues three per
//! stance.

mod adversarial;
mod iterative;
mod single_pass;

pub use adversarial::{reconcile, AdversarialStrategy};
pub use iterative::{fib_scope, refine, IterativeStrategy};
pub use single_pass::SinglePassStrategy;

use crate::config::ControllerConfig;
use crate::provider::{ScoreError, ScoreProvider};
use crate::types::{DeliberationMode, RoundRecord, ScoreSet};

/// What a strategy hands back to the controller.
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    /// Final reconciled score in `0.0..=10.0`.
    pub score: f64,

    /// Every round the strategy produced, in order.
    pub rounds: Vec<RoundRecord>,
}

/// A deliberation tier.
///
/// `baseline` is the estimator's single-pass ScoreSet; the scoring provider
/// is injected per call so the same strategy value can serve different
/// backends.
pub trait DeliberationStrategy {
    fn mode(&self) -> DeliberationMode;

    fn evaluate(
        &self,
        explanation: &str,
        baseline: &ScoreSet,
        provider: &dyn ScoreProvider,
    ) -> Result<StrategyOutcome, ScoreError>;
}

/// Build the strategy for a dispatched mode.
pub fn strategy_for(mode: DeliberationMode, config: &ControllerConfig) -> Box<dyn DeliberationStrategy> {
    match mode {
        DeliberationMode::SinglePass => Box::new(SinglePassStrategy::new()),
        DeliberationMode::Iterative => Box::new(IterativeStrategy::new(
            config.max_rounds,
            config.audit_penalty,
            config.scope_damping,
        )),
        DeliberationMode::Adversarial => {
            Box::new(AdversarialStrategy::new(config.conflict_penalty))
        }
    }
}
