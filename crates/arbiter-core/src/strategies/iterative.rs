//! Iterative strategy: bounded self-reflective refinement.
//!
//! Runs a fixed number of rounds. Each round re-queries all three
//! perspectives with a prompt whose thought scope follows the Fibonacci
//! sequence (1, 2, 3, 5, 8, ...) and which embeds the previous round's
//! assessments. The running score moves toward each fresh score by a weight
//! that grows with scope, and the audit perspective is biased downward by a
//! fixed penalty every round to model persistent skepticism.

use tracing::debug;

use super::{DeliberationStrategy, StrategyOutcome};
use crate::provider::{validate_assessment, PromptContext, ScoreError, ScoreProvider};
use crate::types::{
    Assessment, DeliberationMode, Role, RoundRecord, ScoreSet, SCORE_MAX, SCORE_MIN,
};

/// Thought scope for a zero-based round index: 1, 2, 3, 5, 8, 13, ...
pub fn fib_scope(round: usize) -> u64 {
    let (mut a, mut b) = (1u64, 2u64);
    for _ in 0..round {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}

/// Move a running score toward a fresh score, weighted by scope.
///
/// The weight `scope / (scope + damping)` increases with scope, so deeper
/// rounds refine more aggressively. The result is clamped to the valid
/// score range.
pub fn refine(running: f64, fresh: f64, scope: u64, damping: f64) -> f64 {
    let weight = scope as f64 / (scope as f64 + damping);
    (running + weight * (fresh - running)).clamp(SCORE_MIN, SCORE_MAX)
}

/// The iterative deliberation tier.
pub struct IterativeStrategy {
    max_rounds: usize,
    audit_penalty: f64,
    scope_damping: f64,
}

impl IterativeStrategy {
    pub fn new(max_rounds: usize, audit_penalty: f64, scope_damping: f64) -> Self {
        Self {
            max_rounds,
            audit_penalty,
            scope_damping,
        }
    }
}

impl DeliberationStrategy for IterativeStrategy {
    fn mode(&self) -> DeliberationMode {
        DeliberationMode::Iterative
    }

    fn evaluate(
        &self,
        explanation: &str,
        baseline: &ScoreSet,
        provider: &dyn ScoreProvider,
    ) -> Result<StrategyOutcome, ScoreError> {
        let mut previous = baseline.clone();
        let mut rounds = Vec::with_capacity(self.max_rounds);

        for index in 0..self.max_rounds {
            let scope = fib_scope(index);
            let round = index + 1;
            let mut set = ScoreSet::new();

            for role in Role::ALL {
                let ctx = PromptContext::round(explanation, round, scope, Some(&previous));
                let fresh = validate_assessment(role, provider.score(role, &ctx)?)?;
                let running = previous
                    .get(role)
                    .map(|a| a.score)
                    .unwrap_or(fresh.score);

                let mut updated = refine(running, fresh.score, scope, self.scope_damping);
                if role == Role::Audit {
                    updated = (updated - self.audit_penalty).clamp(SCORE_MIN, SCORE_MAX);
                }
                debug!(role = %role, round, scope, running, fresh = fresh.score, updated, "refined");
                set.insert(role, Assessment::new(updated, fresh.rationale));
            }

            rounds.push(RoundRecord {
                round,
                scope,
                stance: None,
                set: set.clone(),
            });
            previous = set;
        }

        Ok(StrategyOutcome {
            score: previous.mean(),
            rounds,
        })
    }
}
