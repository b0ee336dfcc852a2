//! Core types for adaptive deliberation.
//!
//! The data model is small and deliberately strict:
//! - Exactly three scoring perspectives ([`Role`])
//! - Scores bounded to `0.0..=10.0` ([`Assessment`])
//! - Deterministic iteration order everywhere (`BTreeMap`, never `HashMap`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Valid range for perspective scores.
pub const SCORE_MIN: f64 = 0.0;
/// Upper bound for perspective scores.
pub const SCORE_MAX: f64 = 10.0;

/// One of the three fixed evaluative perspectives.
///
/// Every evaluation consults exactly these three roles; there is no
/// mechanism for registering additional perspectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Is the explanation logically sound?
    Principle,
    /// Is the explanation clearly expressed?
    Expression,
    /// What is wrong or missing? The skeptical perspective.
    Audit,
}

impl Role {
    /// All roles, in canonical order.
    pub const ALL: [Role; 3] = [Role::Principle, Role::Expression, Role::Audit];

    /// Stable identifier used in prompts and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Principle => "principle",
            Role::Expression => "expression",
            Role::Audit => "audit",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single perspective's verdict: a bounded score plus its rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Numeric score in `0.0..=10.0`.
    pub score: f64,

    /// Free-text reasoning behind the score.
    pub rationale: String,
}

impl Assessment {
    pub fn new(score: f64, rationale: impl Into<String>) -> Self {
        Self {
            score,
            rationale: rationale.into(),
        }
    }
}

/// One round's worth of assessments, keyed by role.
///
/// The map key makes duplicate perspectives unrepresentable, and `BTreeMap`
/// keeps iteration order deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    assessments: BTreeMap<Role, Assessment>,
}

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the assessment for a role.
    pub fn insert(&mut self, role: Role, assessment: Assessment) {
        self.assessments.insert(role, assessment);
    }

    pub fn get(&self, role: Role) -> Option<&Assessment> {
        self.assessments.get(&role)
    }

    pub fn len(&self) -> usize {
        self.assessments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assessments.is_empty()
    }

    /// Whether all three perspectives are present.
    pub fn is_complete(&self) -> bool {
        self.assessments.len() == Role::ALL.len()
    }

    /// Iterate assessments in canonical role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &Assessment)> {
        self.assessments.iter().map(|(r, a)| (*r, a))
    }

    /// Raw scores in canonical role order.
    pub fn scores(&self) -> Vec<f64> {
        self.assessments.values().map(|a| a.score).collect()
    }

    /// Unweighted mean of the scores. Zero for an empty set.
    pub fn mean(&self) -> f64 {
        if self.assessments.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.assessments.values().map(|a| a.score).sum();
        sum / self.assessments.len() as f64
    }

    /// Sample variance (n−1 denominator) of the scores.
    ///
    /// Defined as `0.0` when fewer than two scores are present, in which
    /// case complexity collapses to its floor of 1.
    pub fn sample_variance(&self) -> f64 {
        let scores = self.scores();
        if scores.len() < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = scores.iter().map(|s| (s - mean).powi(2)).sum();
        sum_sq / (scores.len() - 1) as f64
    }
}

/// Disagreement among the perspectives, mapped to `[1, 10]`.
///
/// Higher means more conflicting viewpoints. Monotonically non-decreasing
/// in variance, clamped at 10.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplexityScore(f64);

impl ComplexityScore {
    /// Floor of the complexity scale.
    pub const MIN: f64 = 1.0;
    /// Ceiling of the complexity scale.
    pub const MAX: f64 = 10.0;

    /// Affine mapping from score variance to complexity:
    /// `min(10, 1 + variance * gain)`.
    ///
    /// With the default gain of 4.5, a variance of 2.0 or more clamps to
    /// the maximum complexity of 10.
    pub fn from_variance(variance: f64, gain: f64) -> Self {
        let raw = Self::MIN + variance * gain;
        Self(raw.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for ComplexityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// The three deliberation tiers, in increasing order of cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliberationMode {
    /// One pass, mean of the baseline scores. Minimal cost.
    SinglePass,
    /// Bounded rounds of self-reflective re-scoring.
    Iterative,
    /// Opposing stance passes reconciled into one score.
    Adversarial,
}

impl fmt::Display for DeliberationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeliberationMode::SinglePass => "single_pass",
            DeliberationMode::Iterative => "iterative",
            DeliberationMode::Adversarial => "adversarial",
        };
        f.write_str(s)
    }
}

/// Framing applied to adversarial passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    /// Argue the strongest case for the explanation.
    Advocate,
    /// Argue the strongest case against it.
    Critic,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Advocate => "advocate",
            Stance::Critic => "critic",
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed round of deliberation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Zero-based round index.
    pub round: usize,

    /// Thought scope for the round (Fibonacci-indexed for the iterative
    /// tier, 1 for baseline and stance passes).
    pub scope: u64,

    /// Stance framing, if any (adversarial tier only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stance: Option<Stance>,

    /// All three assessments produced in this round.
    pub set: ScoreSet,
}

/// Final outcome of an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationResult {
    /// Final reconciled score in `0.0..=10.0`.
    pub score: f64,

    /// Which tier produced the score.
    pub mode: DeliberationMode,

    /// Complexity that drove the dispatch decision.
    pub complexity: ComplexityScore,

    /// Sample variance of the baseline scores.
    pub variance: f64,

    /// Per-round history produced by the selected strategy.
    pub rounds: Vec<RoundRecord>,

    /// When the evaluation completed.
    pub evaluated_at: DateTime<Utc>,
}
