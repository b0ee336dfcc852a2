//! Async deliberation orchestrator.
//!
//! Mirrors the core controller's pipeline with one change: within every
//! round the three role queries have no data dependency, so they fan out
//! concurrently via `tokio::join!` and rejoin before aggregation. Rounds
//! stay sequential because later rounds consume earlier assessments.
//!
//! All aggregation math (variance mapping, dispatch, refinement,
//! reconciliation) is delegated to `arbiter-core` so the sync and async
//! paths cannot drift apart.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use arbiter_core::{
    dispatch, fib_scope, reconcile, refine, text, validate_assessment, Assessment,
    ComplexityScore, ConfigError, DeliberationMode, DeliberationResult, EvaluationError,
    PromptContext, Role, RoundRecord, ScoreError, ScoreSet, Stance, SCORE_MAX, SCORE_MIN,
};

use crate::cache::{AssessmentCache, CachedScorer};
use crate::config::RuntimeConfig;
use crate::provider::AsyncScoreProvider;
use crate::resilience::{CallTracker, CallUsage, ResilientScorer};

/// Errors from the runtime orchestrator.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("scoring failure: {0}")]
    Scoring(#[from] ScoreError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("scoring call budget of {limit} exhausted")]
    BudgetExceeded { limit: u32 },
}

/// Result of a runtime evaluation: the deliberation outcome plus what it
/// cost to produce.
#[derive(Debug)]
pub struct RuntimeResult {
    pub result: DeliberationResult,
    pub usage: CallUsage,
}

/// Orchestrates adaptive deliberation over an async scoring provider.
///
/// The given provider is wrapped with the configured timeout/retry policy
/// and, when enabled, the assessment cache.
pub struct DeliberationOrchestrator {
    provider: Arc<dyn AsyncScoreProvider>,
    config: RuntimeConfig,
    tracker: Arc<CallTracker>,
}

impl DeliberationOrchestrator {
    pub fn new(
        provider: Arc<dyn AsyncScoreProvider>,
        config: RuntimeConfig,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;

        let tracker = Arc::new(CallTracker::new(config.max_calls));
        let resilient = ResilientScorer::new(provider, config.retry_policy()?, config.query_timeout()?)
            .with_tracker(tracker.clone());

        let provider: Arc<dyn AsyncScoreProvider> = if config.cache.enabled {
            let cache = AssessmentCache::new(config.cache.max_entries, config.cache_ttl()?);
            Arc::new(CachedScorer::new(resilient, cache).with_tracker(tracker.clone()))
        } else {
            Arc::new(resilient)
        };

        Ok(Self {
            provider,
            config,
            tracker,
        })
    }

    /// Evaluate an explanation end to end.
    pub async fn evaluate(&self, explanation: &str) -> Result<RuntimeResult, RuntimeError> {
        text::validate(explanation).map_err(EvaluationError::from)?;
        self.tracker.reset();

        let controller = &self.config.controller;
        let baseline = self
            .query_trio(PromptContext::baseline(explanation))
            .await?;
        let variance = baseline.sample_variance();
        let complexity = ComplexityScore::from_variance(variance, controller.variance_gain);
        let mode = dispatch(complexity, &controller.thresholds);

        let (score, rounds) = match mode {
            DeliberationMode::SinglePass => {
                // Must not re-query; aggregate the baseline as-is.
                let record = RoundRecord {
                    round: 0,
                    scope: 1,
                    stance: None,
                    set: baseline.clone(),
                };
                (baseline.mean(), vec![record])
            }
            DeliberationMode::Iterative => self.run_iterative(explanation, &baseline).await?,
            DeliberationMode::Adversarial => self.run_adversarial(explanation).await?,
        };

        info!(mode = %mode, score, calls = self.tracker.usage().scoring_calls, "deliberation complete");
        Ok(RuntimeResult {
            result: DeliberationResult {
                score,
                mode,
                complexity,
                variance,
                rounds,
                evaluated_at: Utc::now(),
            },
            usage: self.tracker.usage(),
        })
    }

    /// Fan out one round's three role queries and rejoin.
    async fn query_trio(&self, ctx: PromptContext<'_>) -> Result<ScoreSet, RuntimeError> {
        if !self.tracker.budget().can_afford(Role::ALL.len() as u32) {
            return Err(RuntimeError::BudgetExceeded {
                limit: self.tracker.budget().max_calls(),
            });
        }

        let (principle, expression, audit) = tokio::join!(
            self.query(Role::Principle, &ctx),
            self.query(Role::Expression, &ctx),
            self.query(Role::Audit, &ctx),
        );

        let mut set = ScoreSet::new();
        set.insert(Role::Principle, principle?);
        set.insert(Role::Expression, expression?);
        set.insert(Role::Audit, audit?);
        Ok(set)
    }

    async fn query(&self, role: Role, ctx: &PromptContext<'_>) -> Result<Assessment, ScoreError> {
        self.tracker.record_call();
        let assessment = self.provider.score(role, ctx).await?;
        validate_assessment(role, assessment)
    }

    async fn run_iterative(
        &self,
        explanation: &str,
        baseline: &ScoreSet,
    ) -> Result<(f64, Vec<RoundRecord>), RuntimeError> {
        let cfg = &self.config.controller;
        let mut previous = baseline.clone();
        let mut rounds = Vec::with_capacity(cfg.max_rounds);

        for index in 0..cfg.max_rounds {
            let scope = fib_scope(index);
            let round = index + 1;

            let fresh = self
                .query_trio(PromptContext::round(explanation, round, scope, Some(&previous)))
                .await?;

            let mut set = ScoreSet::new();
            for (role, assessment) in fresh.iter() {
                let running = previous
                    .get(role)
                    .map(|a| a.score)
                    .unwrap_or(assessment.score);

                let mut updated = refine(running, assessment.score, scope, cfg.scope_damping);
                if role == Role::Audit {
                    updated = (updated - cfg.audit_penalty).clamp(SCORE_MIN, SCORE_MAX);
                }
                set.insert(role, Assessment::new(updated, assessment.rationale.clone()));
            }

            rounds.push(RoundRecord {
                round,
                scope,
                stance: None,
                set: set.clone(),
            });
            previous = set;
        }

        Ok((previous.mean(), rounds))
    }

    async fn run_adversarial(
        &self,
        explanation: &str,
    ) -> Result<(f64, Vec<RoundRecord>), RuntimeError> {
        let cfg = &self.config.controller;

        let advocate = self
            .query_trio(PromptContext::stance(explanation, Stance::Advocate))
            .await?;
        let critic = self
            .query_trio(PromptContext::stance(explanation, Stance::Critic))
            .await?;

        let score = reconcile(advocate.mean(), critic.mean(), cfg.conflict_penalty);
        let rounds = vec![
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
        ];
        Ok((score, rounds))
    }

    /// Usage accumulated by the most recent evaluation.
    pub fn usage(&self) -> CallUsage {
        self.tracker.usage()
    }
}
