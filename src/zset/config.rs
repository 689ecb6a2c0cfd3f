//! Sorted-set configuration
//!
//! Loaded from a JSON file; every field is optional and defaulted.
//!
//! ```json
//! { "max_level": 32, "level_probability": 0.25, "seed": 7, "log_level": "warn" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;

use super::errors::{ZSetError, ZSetResult};

/// Hard ceiling for `max_level`.
pub const MAX_LEVEL_LIMIT: usize = 64;

/// Sorted-set engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZSetConfig {
    /// Maximum number of levels a skip list node may span (default: 32)
    #[serde(default = "default_max_level")]
    pub max_level: usize,

    /// Probability of promoting a node one more level (default: 0.25)
    #[serde(default = "default_level_probability")]
    pub level_probability: f64,

    /// Fixed RNG seed for level assignment (default: entropy-seeded)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Minimum severity written by the logger (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_max_level() -> usize {
    32
}

fn default_level_probability() -> f64 {
    0.25
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for ZSetConfig {
    fn default() -> Self {
        Self {
            max_level: default_max_level(),
            level_probability: default_level_probability(),
            seed: None,
            log_level: default_log_level(),
        }
    }
}

impl ZSetConfig {
    /// Create a default config with a fixed seed, for reproducible layouts.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Load configuration from a JSON file and validate it.
    pub fn load(path: &Path) -> ZSetResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ZSetError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string and validate it.
    pub fn from_json(json: &str) -> ZSetResult<Self> {
        let config: ZSetConfig = serde_json::from_str(json)
            .map_err(|e| ZSetError::config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate field ranges.
    pub fn validate(&self) -> ZSetResult<()> {
        if self.max_level == 0 || self.max_level > MAX_LEVEL_LIMIT {
            return Err(ZSetError::config(format!(
                "max_level must be in 1..={}, got {}",
                MAX_LEVEL_LIMIT, self.max_level
            )));
        }

        if !(self.level_probability > 0.0 && self.level_probability < 1.0) {
            return Err(ZSetError::config(format!(
                "level_probability must be strictly between 0 and 1, got {}",
                self.level_probability
            )));
        }

        Ok(())
    }
}
