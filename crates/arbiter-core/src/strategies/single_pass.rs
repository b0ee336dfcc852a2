//! Single-pass strategy: the minimal-cost path.

use super::{DeliberationStrategy, StrategyOutcome};
use crate::provider::{ScoreError, ScoreProvider};
use crate::types::{DeliberationMode, RoundRecord, ScoreSet};

/// Returns the unweighted mean of the baseline assessments.
///
/// The estimator has already queried each perspective exactly once; this
/// strategy must not re-query, so it aggregates those scores as-is. A full
/// single-pass evaluation therefore costs three scoring calls end to end.
pub struct SinglePassStrategy;

impl SinglePassStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SinglePassStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliberationStrategy for SinglePassStrategy {
    fn mode(&self) -> DeliberationMode {
        DeliberationMode::SinglePass
    }

    fn evaluate(
        &self,
        _explanation: &str,
        baseline: &ScoreSet,
        _provider: &dyn ScoreProvider,
    ) -> Result<StrategyOutcome, ScoreError> {
        Ok(StrategyOutcome {
            score: baseline.mean(),
            rounds: vec![RoundRecord {
                round: 0,
                scope: 1,
                stance: None,
                set: baseline.clone(),
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FixedScorer, PromptContext};
    use crate::types::{Assessment, Role};

    fn baseline_of(scores: [f64; 3]) -> ScoreSet {
        let mut set = ScoreSet::new();
        for (role, score) in Role::ALL.iter().zip(scores) {
            set.insert(*role, Assessment::new(score, "baseline"));
        }
        set
    }

    #[test]
    fn returns_unweighted_mean_of_baseline() {
        let strategy = SinglePassStrategy::new();
        let baseline = baseline_of([7.0, 7.0, 7.0]);
        let outcome = strategy
            .evaluate("text", &baseline, &FixedScorer::uniform(0.0))
            .unwrap();
        assert_eq!(outcome.score, 7.0);
        assert_eq!(outcome.rounds.len(), 1);
        assert_eq!(outcome.rounds[0].set, baseline);
    }

    #[test]
    fn never_touches_the_provider() {
        struct PanicScorer;
        impl ScoreProvider for PanicScorer {
            fn score(
                &self,
                _role: Role,
                _ctx: &PromptContext<'_>,
            ) -> Result<Assessment, ScoreError> {
                panic!("single-pass must not re-query");
            }
        }

        let strategy = SinglePassStrategy::new();
        let baseline = baseline_of([8.0, 6.0, 7.0]);
        let outcome = strategy.evaluate("text", &baseline, &PanicScorer).unwrap();
        assert!((outcome.score - 7.0).abs() < 1e-9);
    }
}
