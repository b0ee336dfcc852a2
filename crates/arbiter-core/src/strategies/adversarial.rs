//! Adversarial synthesis: opposing stance passes reconciled into one score.
//!
//! The high-conflict tier. Two framed passes — advocate and critic — each
//! query all three perspectives with stance framing, so the strategy always
//! issues six fresh scoring calls and cannot silently degrade to the
//! single-pass result. The stance means are reconciled with a conflict
//! penalty: the further apart the opposing cases land, the more the
//! synthesized score is discounted.

use tracing::debug;

use super::{DeliberationStrategy, StrategyOutcome};
use crate::provider::{validate_assessment, PromptContext, ScoreError, ScoreProvider};
use crate::types::{DeliberationMode, Role, RoundRecord, ScoreSet, Stance, SCORE_MAX, SCORE_MIN};

/// Reconcile two opposing stance means into one score.
///
/// Equal-weight average minus `conflict_penalty` per point of disagreement,
/// clamped to the valid score range.
pub fn reconcile(advocate_mean: f64, critic_mean: f64, conflict_penalty: f64) -> f64 {
    let midpoint = (advocate_mean + critic_mean) / 2.0;
    let conflict = (advocate_mean - critic_mean).abs();
    (midpoint - conflict_penalty * conflict).clamp(SCORE_MIN, SCORE_MAX)
}

/// The adversarial deliberation tier.
pub struct AdversarialStrategy {
    conflict_penalty: f64,
}

impl AdversarialStrategy {
    pub fn new(conflict_penalty: f64) -> Self {
        Self { conflict_penalty }
    }

    fn stance_pass(
        &self,
        explanation: &str,
        stance: Stance,
        provider: &dyn ScoreProvider,
    ) -> Result<ScoreSet, ScoreError> {
        let ctx = PromptContext::stance(explanation, stance);
        let mut set = ScoreSet::new();
        for role in Role::ALL {
            let assessment = validate_assessment(role, provider.score(role, &ctx)?)?;
            set.insert(role, assessment);
        }
        Ok(set)
    }
}

impl DeliberationStrategy for AdversarialStrategy {
    fn mode(&self) -> DeliberationMode {
        DeliberationMode::Adversarial
    }

    fn evaluate(
        &self,
        explanation: &str,
        _baseline: &ScoreSet,
        provider: &dyn ScoreProvider,
    ) -> Result<StrategyOutcome, ScoreError> {
        let advocate = self.stance_pass(explanation, Stance::Advocate, provider)?;
        let critic = self.stance_pass(explanation, Stance::Critic, provider)?;

        let advocate_mean = advocate.mean();
        let critic_mean = critic.mean();
        let score = reconcile(advocate_mean, critic_mean, self.conflict_penalty);
        debug!(advocate_mean, critic_mean, score, "adversarial synthesis");

        Ok(StrategyOutcome {
            score,
            rounds: vec![
                RoundRecord {
                    round: 0,
                    scope: 1,
                    stance: Some(Stance::Advocate),
                    set: advocate,
                },
                RoundRecord {
                    round: 1,
                    scope: 1,
                    stance: Some(Stance::Critic),
                    set: critic,
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Assessment;

    /// Scorer that answers differently per stance.
    struct StanceScorer {
        advocate: f64,
        critic: f64,
    }

    impl ScoreProvider for StanceScorer {
        fn score(&self, role: Role, ctx: &PromptContext<'_>) -> Result<Assessment, ScoreError> {
            let score = match ctx.stance {
                Some(Stance::Advocate) => self.advocate,
                Some(Stance::Critic) => self.critic,
                None => {
                    return Err(ScoreError::Failed {
                        role,
                        message: "adversarial pass without stance framing".to_string(),
                    })
                }
            };
            Ok(Assessment::new(score, format!("{role} under stance")))
        }
    }

    #[test]
    fn reconcile_penalizes_disagreement() {
        // Agreement: plain midpoint.
        assert_eq!(reconcile(7.0, 7.0, 0.25), 7.0);
        // Two points of spread cost half a point at the default penalty.
        assert!((reconcile(8.0, 6.0, 0.25) - 6.5).abs() < 1e-9);
        // Penalty-free reconciliation is the plain mean.
        assert_eq!(reconcile(8.0, 6.0, 0.0), 7.0);
    }

    #[test]
    fn reconcile_stays_in_range() {
        assert!(reconcile(10.0, 0.0, 1.0) >= SCORE_MIN);
        assert!(reconcile(10.0, 10.0, 0.0) <= SCORE_MAX);
    }

    #[test]
    fn runs_both_stances_and_records_them() {
        let strategy = AdversarialStrategy::new(0.25);
        let outcome = strategy
            .evaluate(
                "conflicted explanation",
                &ScoreSet::new(),
                &StanceScorer {
                    advocate: 8.0,
                    critic: 5.0,
                },
            )
            .unwrap();

        assert_eq!(outcome.rounds.len(), 2);
        assert_eq!(outcome.rounds[0].stance, Some(Stance::Advocate));
        assert_eq!(outcome.rounds[1].stance, Some(Stance::Critic));
        assert!(outcome.rounds.iter().all(|r| r.set.is_complete()));

        // midpoint 6.5 minus 0.25 * 3.0 of conflict
        assert!((outcome.score - 5.75).abs() < 1e-9);
    }

    #[test]
    fn does_not_degrade_to_single_pass() {
        // A baseline mean of 9.0 must not leak through; the synthesis comes
        // from the stance passes alone.
        let mut baseline = ScoreSet::new();
        for role in Role::ALL {
            baseline.insert(role, Assessment::new(9.0, "baseline"));
        }

        let strategy = AdversarialStrategy::new(0.25);
        let outcome = strategy
            .evaluate(
                "text",
                &baseline,
                &StanceScorer {
                    advocate: 6.0,
                    critic: 4.0,
                },
            )
            .unwrap();
        assert!((outcome.score - 4.5).abs() < 1e-9);
    }

    #[test]
    fn critic_pass_failure_aborts() {
        struct AdvocateOnly;
        impl ScoreProvider for AdvocateOnly {
            fn score(
                &self,
                role: Role,
                ctx: &PromptContext<'_>,
            ) -> Result<Assessment, ScoreError> {
                match ctx.stance {
                    Some(Stance::Advocate) => Ok(Assessment::new(7.0, "fine")),
                    _ => Err(ScoreError::Failed {
                        role,
                        message: "critic backend down".to_string(),
                    }),
                }
            }
        }

        let strategy = AdversarialStrategy::new(0.25);
        assert!(strategy
            .evaluate("text", &ScoreSet::new(), &AdvocateOnly)
            .is_err());
    }
}
