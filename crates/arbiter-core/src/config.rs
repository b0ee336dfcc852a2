//! Controller configuration.
//!
//! Every tunable from the routing core lives here so thresholds can be
//! adjusted without code changes. Configs load from YAML and are validated
//! explicitly; an invalid config is rejected before any scoring happens.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}

/// Dispatch thresholds over the `[1, 10]` complexity scale.
///
/// `low` and `high` split the scale into the three deliberation tiers.
/// Both boundaries are inclusive on the cheaper side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispatchThresholds {
    /// Complexity at or below this routes to single-pass.
    #[serde(default = "default_low")]
    pub low: f64,

    /// Complexity at or below this (and above `low`) routes to iterative;
    /// anything higher routes to adversarial synthesis.
    #[serde(default = "default_high")]
    pub high: f64,
}

fn default_low() -> f64 {
    2.0
}

fn default_high() -> f64 {
    5.0
}

impl Default for DispatchThresholds {
    fn default() -> Self {
        Self {
            low: default_low(),
            high: default_high(),
        }
    }
}

/// Full configuration for the deliberation controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Mode dispatch thresholds.
    #[serde(default)]
    pub thresholds: DispatchThresholds,

    /// Gain of the variance → complexity affine map.
    #[serde(default = "default_variance_gain")]
    pub variance_gain: f64,

    /// Number of refinement rounds for the iterative tier.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,

    /// Per-round downward bias applied to the audit perspective.
    #[serde(default = "default_audit_penalty")]
    pub audit_penalty: f64,

    /// Damping constant for scope-weighted refinement; larger values slow
    /// convergence toward fresh scores.
    #[serde(default = "default_scope_damping")]
    pub scope_damping: f64,

    /// Penalty per point of disagreement between adversarial stances.
    #[serde(default = "default_conflict_penalty")]
    pub conflict_penalty: f64,
}

fn default_variance_gain() -> f64 {
    4.5
}

fn default_max_rounds() -> usize {
    4
}

fn default_audit_penalty() -> f64 {
    0.5
}

fn default_scope_damping() -> f64 {
    4.0
}

fn default_conflict_penalty() -> f64 {
    0.25
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            thresholds: DispatchThresholds::default(),
            variance_gain: default_variance_gain(),
            max_rounds: default_max_rounds(),
            audit_penalty: default_audit_penalty(),
            scope_damping: default_scope_damping(),
            conflict_penalty: default_conflict_penalty(),
        }
    }
}

impl ControllerConfig {
    /// Parse a config from a YAML string and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file and validate it.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check internal consistency of the config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.thresholds.low.is_finite() || !self.thresholds.high.is_finite() {
            return Err(ConfigError::Validation(
                "thresholds must be finite".to_string(),
            ));
        }
        if self.thresholds.low >= self.thresholds.high {
            return Err(ConfigError::Validation(format!(
                "threshold low ({}) must be strictly below high ({})",
                self.thresholds.low, self.thresholds.high
            )));
        }
        if !(self.variance_gain.is_finite() && self.variance_gain > 0.0) {
            return Err(ConfigError::Validation(format!(
                "variance_gain must be positive, got {}",
                self.variance_gain
            )));
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::Validation(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        if self.audit_penalty < 0.0 || !self.audit_penalty.is_finite() {
            return Err(ConfigError::Validation(format!(
                "audit_penalty must be non-negative, got {}",
                self.audit_penalty
            )));
        }
        if !(self.scope_damping.is_finite() && self.scope_damping > 0.0) {
            return Err(ConfigError::Validation(format!(
                "scope_damping must be positive, got {}",
                self.scope_damping
            )));
        }
        if self.conflict_penalty < 0.0 || !self.conflict_penalty.is_finite() {
            return Err(ConfigError::Validation(format!(
                "conflict_penalty must be non-negative, got {}",
                self.conflict_penalty
            )));
        }
        Ok(())
    }
}
