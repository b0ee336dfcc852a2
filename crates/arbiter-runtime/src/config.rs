//! Runtime configuration.
//!
//! Wraps the core controller config with the knobs that only matter once
//! scoring calls are real: per-call timeout, retry policy, call budget, and
//! cache sizing. Durations are human-readable strings ("10s", "250ms").

use std::fs;
use std::path::Path;
use std::time::Duration;

use arbiter_core::{ConfigError, ControllerConfig};
use serde::{Deserialize, Serialize};

use crate::resilience::RetryPolicy;

/// Retry settings as they appear in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Retries after the first attempt; zero disables retrying.
    #[serde(default)]
    pub max_retries: u32,

    #[serde(default = "default_min_delay")]
    pub min_delay: String,

    #[serde(default = "default_max_delay")]
    pub max_delay: String,
}

fn default_min_delay() -> String {
    "100ms".to_string()
}

fn default_max_delay() -> String {
    "2s".to_string()
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 0,
            min_delay: default_min_delay(),
            max_delay: default_max_delay(),
        }
    }
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,

    #[serde(default = "default_cache_ttl")]
    pub ttl: String,
}

fn default_cache_entries() -> u64 {
    10_000
}

fn default_cache_ttl() -> String {
    "1h".to_string()
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_entries: default_cache_entries(),
            ttl: default_cache_ttl(),
        }
    }
}

/// Full runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// The routing core's configuration.
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Per-attempt timeout for one scoring call.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: String,

    /// Hard cap on scoring calls per evaluation.
    #[serde(default = "default_max_calls")]
    pub max_calls: u32,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub cache: CacheSettings,
}

fn default_query_timeout() -> String {
    "10s".to_string()
}

fn default_max_calls() -> u32 {
    32
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            query_timeout: default_query_timeout(),
            max_calls: default_max_calls(),
            retry: RetrySettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.controller.validate()?;
        self.query_timeout()?;
        self.retry_policy()?;
        self.cache_ttl()?;
        if self.max_calls == 0 {
            return Err(ConfigError::Validation(
                "max_calls must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn query_timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("query_timeout", &self.query_timeout)
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        Ok(RetryPolicy {
            max_retries: self.retry.max_retries,
            min_delay: parse_duration("retry.min_delay", &self.retry.min_delay)?,
            max_delay: parse_duration("retry.max_delay", &self.retry.max_delay)?,
        })
    }

    pub fn cache_ttl(&self) -> Result<Duration, ConfigError> {
        parse_duration("cache.ttl", &self.cache.ttl)
    }
}

fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value)
        .map_err(|e| ConfigError::Validation(format!("{field}: invalid duration '{value}': {e}")))
}
