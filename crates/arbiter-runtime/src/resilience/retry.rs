//! Timeout and retry wrapper for async scoring providers.

use std::sync::Arc;
use std::time::Duration;

use arbiter_core::{Assessment, PromptContext, Role, ScoreError};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use tracing::warn;

use super::CallTracker;
use crate::provider::AsyncScoreProvider;

/// Retry policy for transient scoring failures.
///
/// Only `ScoreError::Failed` is retried; an out-of-range score is a
/// provider contract violation and retrying it would just repeat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,

    /// First backoff delay.
    pub min_delay: Duration,

    /// Ceiling for the exponential backoff.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries as usize)
    }
}

/// Wraps a provider with a per-attempt timeout and backoff retry.
pub struct ResilientScorer<P> {
    inner: P,
    policy: RetryPolicy,
    timeout: Duration,
    tracker: Option<Arc<CallTracker>>,
}

impl<P> ResilientScorer<P>
where
    P: AsyncScoreProvider,
{
    pub fn new(inner: P, policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            inner,
            policy,
            timeout,
            tracker: None,
        }
    }

    /// Report retries into a shared tracker.
    pub fn with_tracker(mut self, tracker: Arc<CallTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }
}

#[async_trait]
impl<P> AsyncScoreProvider for ResilientScorer<P>
where
    P: AsyncScoreProvider,
{
    async fn score(&self, role: Role, ctx: &PromptContext<'_>) -> Result<Assessment, ScoreError> {
        let attempt = || async {
            tokio::time::timeout(self.timeout, self.inner.score(role, ctx))
                .await
                .map_err(|_| ScoreError::Failed {
                    role,
                    message: format!(
                        "timed out after {}",
                        humantime::format_duration(self.timeout)
                    ),
                })?
        };

        attempt
            .retry(self.policy.backoff())
            .when(|err| matches!(err, ScoreError::Failed { .. }))
            .notify(|err, delay| {
                warn!(provider = self.inner.name(), error = %err, ?delay, "retrying scoring call");
                if let Some(tracker) = &self.tracker {
                    tracker.record_retry();
                }
            })
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls, then succeeds.
    struct FlakyProvider {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl AsyncScoreProvider for FlakyProvider {
        async fn score(
            &self,
            role: Role,
            _ctx: &PromptContext<'_>,
        ) -> Result<Assessment, ScoreError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(ScoreError::Failed {
                    role,
                    message: "transient".to_string(),
                })
            } else {
                Ok(Assessment::new(6.5, "recovered"))
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn retries_transient_failures() {
        let tracker = Arc::new(CallTracker::new(100));
        let scorer = ResilientScorer::new(
            FlakyProvider {
                failures: 2,
                calls: AtomicU32::new(0),
            },
            fast_policy(3),
            Duration::from_secs(1),
        )
        .with_tracker(tracker.clone());

        let ctx = PromptContext::baseline("text");
        let assessment = scorer.score(Role::Principle, &ctx).await.unwrap();
        assert_eq!(assessment.score, 6.5);
        assert_eq!(tracker.usage().retries, 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let scorer = ResilientScorer::new(
            FlakyProvider {
                failures: 10,
                calls: AtomicU32::new(0),
            },
            fast_policy(2),
            Duration::from_secs(1),
        );

        let ctx = PromptContext::baseline("text");
        assert!(scorer.score(Role::Audit, &ctx).await.is_err());
    }

    #[tokio::test]
    async fn out_of_range_is_not_retried() {
        struct BadScorer {
            calls: AtomicU32,
        }

        #[async_trait]
        impl AsyncScoreProvider for BadScorer {
            async fn score(
                &self,
                role: Role,
                _ctx: &PromptContext<'_>,
            ) -> Result<Assessment, ScoreError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Err(ScoreError::OutOfRange { role, value: 42.0 })
            }
        }

        let bad = BadScorer {
            calls: AtomicU32::new(0),
        };
        let scorer = ResilientScorer::new(bad, fast_policy(5), Duration::from_secs(1));
        let ctx = PromptContext::baseline("text");
        assert!(scorer.score(Role::Expression, &ctx).await.is_err());
        assert_eq!(scorer.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        struct SlowProvider;

        #[async_trait]
        impl AsyncScoreProvider for SlowProvider {
            async fn score(
                &self,
                _role: Role,
                _ctx: &PromptContext<'_>,
            ) -> Result<Assessment, ScoreError> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(Assessment::new(7.0, "too late"))
            }
        }

        let scorer = ResilientScorer::new(SlowProvider, fast_policy(0), Duration::from_millis(10));
        let ctx = PromptContext::baseline("text");
        let err = scorer.score(Role::Principle, &ctx).await.unwrap_err();
        assert!(matches!(err, ScoreError::Failed { .. }));
    }
}
