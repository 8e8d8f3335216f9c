//! Runtime settings for chain evaluation.
//!
//! [`ChainSettings`] can be built in code with the `with_*` methods or
//! deserialised from JSON. Missing fields fall back to their defaults;
//! unknown fields are rejected so typos surface at configuration time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::failure_reporter::DEFAULT_WARN_INTERVAL_SECS;

/// Default cap on the number of filters visited for a single record.
pub const DEFAULT_MAX_HOPS: usize = 1024;

/// Errors that may occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings document could not be parsed.
    #[error("failed to parse chain settings: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field held a value outside its accepted range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tunables applied by the chain evaluator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainSettings {
    /// Maximum filters consulted per record before traversal is abandoned
    /// as cyclic.
    pub max_hops: usize,
    /// Minimum seconds between warnings about failing filters.
    pub failure_warn_interval_secs: u64,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            failure_warn_interval_secs: DEFAULT_WARN_INTERVAL_SECS,
        }
    }
}

impl ChainSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hop limit.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Set the interval between failure warnings.
    pub fn with_failure_warn_interval(mut self, secs: u64) -> Self {
        self.failure_warn_interval_secs = secs;
        self
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_hops == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_hops",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Parse and validate settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}
