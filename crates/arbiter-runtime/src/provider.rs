//! Async scoring providers.

use arbiter_core::{Assessment, PromptContext, Role, ScoreError, ScoreProvider};
use async_trait::async_trait;

/// Async flavor of the scoring call.
///
/// Same contract as [`ScoreProvider`]: a failed or out-of-range score is an
/// error, never a silently substituted default.
#[async_trait]
pub trait AsyncScoreProvider: Send + Sync {
    async fn score(&self, role: Role, ctx: &PromptContext<'_>) -> Result<Assessment, ScoreError>;

    /// Provider name for logs.
    fn name(&self) -> &str {
        "unnamed"
    }
}

#[async_trait]
impl<P> AsyncScoreProvider for std::sync::Arc<P>
where
    P: AsyncScoreProvider + ?Sized,
{
    async fn score(&self, role: Role, ctx: &PromptContext<'_>) -> Result<Assessment, ScoreError> {
        (**self).score(role, ctx).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Adapts any synchronous core provider to the async trait.
///
/// Useful for the simulated and fixed scorers, whose calls are cheap enough
/// that blocking the executor is not a concern.
pub struct SyncBridge<P> {
    inner: P,
    name: String,
}

impl<P> SyncBridge<P>
where
    P: ScoreProvider + Send + Sync,
{
    pub fn new(inner: P, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }
}

#[async_trait]
impl<P> AsyncScoreProvider for SyncBridge<P>
where
    P: ScoreProvider + Send + Sync,
{
    async fn score(&self, role: Role, ctx: &PromptContext<'_>) -> Result<Assessment, ScoreError> {
        self.inner.score(role, ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::FixedScorer;

    #[tokio::test]
    async fn bridge_passes_scores_through() {
        let bridge = SyncBridge::new(FixedScorer::new([7.5, 6.0, 5.5]), "fixed");
        let ctx = PromptContext::baseline("text");
        let assessment = bridge.score(Role::Expression, &ctx).await.unwrap();
        assert_eq!(assessment.score, 6.0);
        assert_eq!(bridge.name(), "fixed");
    }
}
