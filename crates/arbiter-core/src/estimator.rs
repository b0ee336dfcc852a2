//! Complexity estimation from perspective disagreement.
//!
//! The estimator queries each of the three perspectives exactly once with
//! the baseline context and measures the variance of their scores. High
//! variance means the perspectives disagree, which is the signal that the
//! explanation carries internal conflict and deserves deeper deliberation.

use tracing::{debug, info};

use crate::provider::{validate_assessment, PromptContext, ScoreError, ScoreProvider};
use crate::types::{ComplexityScore, Role, ScoreSet};

/// Output of a complexity assessment.
#[derive(Debug, Clone)]
pub struct ComplexityAssessment {
    /// The mapped complexity in `[1, 10]`.
    pub complexity: ComplexityScore,

    /// Sample variance of the baseline scores.
    pub variance: f64,

    /// The baseline assessments, reused by the single-pass strategy.
    pub baseline: ScoreSet,
}

/// Maps perspective disagreement to the `[1, 10]` complexity scale.
#[derive(Debug, Clone, Copy)]
pub struct ComplexityEstimator {
    gain: f64,
}

impl ComplexityEstimator {
    /// `gain` scales variance before the affine map; see
    /// [`ComplexityScore::from_variance`].
    pub fn new(gain: f64) -> Self {
        Self { gain }
    }

    /// Query all three perspectives once and derive the complexity score.
    ///
    /// Single round, no iteration. A failed or out-of-range score aborts
    /// the assessment.
    pub fn estimate(
        &self,
        explanation: &str,
        provider: &dyn ScoreProvider,
    ) -> Result<ComplexityAssessment, ScoreError> {
        let ctx = PromptContext::baseline(explanation);
        let mut baseline = ScoreSet::new();

        for role in Role::ALL {
            let assessment = validate_assessment(role, provider.score(role, &ctx)?)?;
            debug!(role = %role, score = assessment.score, "baseline assessment");
            baseline.insert(role, assessment);
        }

        let variance = baseline.sample_variance();
        let complexity = ComplexityScore::from_variance(variance, self.gain);
        info!(variance, complexity = %complexity, "complexity assessed");

        Ok(ComplexityAssessment {
            complexity,
            variance,
            baseline,
        })
    }
}
