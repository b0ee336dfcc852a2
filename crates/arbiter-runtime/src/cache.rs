//! Assessment caching.
//!
//! Identical (role, prompt) pairs return identical assessments for any
//! deterministic provider, so repeated evaluations of the same explanation
//! can skip the provider entirely.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use arbiter_core::{Assessment, PromptContext, Role, ScoreError};
use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::provider::AsyncScoreProvider;
use crate::resilience::CallTracker;

/// Cache key over a role and its rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    role: Role,
    prompt_hash: u64,
}

impl CacheKey {
    pub fn new(role: Role, ctx: &PromptContext<'_>) -> Self {
        let mut hasher = DefaultHasher::new();
        ctx.render(role).hash(&mut hasher);
        Self {
            role,
            prompt_hash: hasher.finish(),
        }
    }
}

/// In-memory assessment cache backed by moka.
pub struct AssessmentCache {
    cache: Cache<CacheKey, Assessment>,
}

impl AssessmentCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Assessment> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: CacheKey, assessment: Assessment) {
        self.cache.insert(key, assessment).await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for AssessmentCache {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(3600))
    }
}

/// Provider wrapper that serves repeated prompts from the cache.
pub struct CachedScorer<P> {
    inner: P,
    cache: AssessmentCache,
    tracker: Option<Arc<CallTracker>>,
}

impl<P> CachedScorer<P>
where
    P: AsyncScoreProvider,
{
    pub fn new(inner: P, cache: AssessmentCache) -> Self {
        Self {
            inner,
            cache,
            tracker: None,
        }
    }

    /// Report cache hits into a shared tracker.
    pub fn with_tracker(mut self, tracker: Arc<CallTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn cache(&self) -> &AssessmentCache {
        &self.cache
    }
}

#[async_trait]
impl<P> AsyncScoreProvider for CachedScorer<P>
where
    P: AsyncScoreProvider,
{
    async fn score(&self, role: Role, ctx: &PromptContext<'_>) -> Result<Assessment, ScoreError> {
        let key = CacheKey::new(role, ctx);

        if let Some(hit) = self.cache.get(&key).await {
            debug!(role = %role, "assessment served from cache");
            if let Some(tracker) = &self.tracker {
                tracker.record_cache_hit();
            }
            return Ok(hit);
        }

        let assessment = self.inner.score(role, ctx).await?;
        self.cache.insert(key, assessment.clone()).await;
        Ok(assessment)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingProvider {
        calls: AtomicU32,
    }

    #[async_trait]
    impl AsyncScoreProvider for CountingProvider {
        async fn score(
            &self,
            _role: Role,
            _ctx: &PromptContext<'_>,
        ) -> Result<Assessment, ScoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Assessment::new(7.0, "counted"))
        }
    }

    #[tokio::test]
    async fn repeated_prompts_hit_the_cache() {
        let tracker = Arc::new(CallTracker::new(100));
        let scorer = CachedScorer::new(
            CountingProvider {
                calls: AtomicU32::new(0),
            },
            AssessmentCache::default(),
        )
        .with_tracker(tracker.clone());

        let ctx = PromptContext::baseline("repeatable explanation");
        let first = scorer.score(Role::Principle, &ctx).await.unwrap();
        let second = scorer.score(Role::Principle, &ctx).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(scorer.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.usage().cache_hits, 1);
    }

    #[tokio::test]
    async fn different_roles_do_not_collide() {
        let scorer = CachedScorer::new(
            CountingProvider {
                calls: AtomicU32::new(0),
            },
            AssessmentCache::default(),
        );

        let ctx = PromptContext::baseline("shared explanation");
        scorer.score(Role::Principle, &ctx).await.unwrap();
        scorer.score(Role::Audit, &ctx).await.unwrap();
        assert_eq!(scorer.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn provider_errors_are_not_cached() {
        struct FailOnceProvider {
            calls: AtomicU32,
        }

        #[async_trait]
        impl AsyncScoreProvider for FailOnceProvider {
            async fn score(
                &self,
                role: Role,
                _ctx: &PromptContext<'_>,
            ) -> Result<Assessment, ScoreError> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ScoreError::Failed {
                        role,
                        message: "first call fails".to_string(),
                    })
                } else {
                    Ok(Assessment::new(6.0, "second call works"))
                }
            }
        }

        let scorer = CachedScorer::new(
            FailOnceProvider {
                calls: AtomicU32::new(0),
            },
            AssessmentCache::default(),
        );

        let ctx = PromptContext::baseline("error handling");
        assert!(scorer.score(Role::Expression, &ctx).await.is_err());
        assert!(scorer.score(Role::Expression, &ctx).await.is_ok());
    }
}
