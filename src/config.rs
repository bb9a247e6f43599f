//! Tuning for one balancing session.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::explore::{Params, DEFAULT_MAX_ITERATIONS};
use crate::model::condition::{Condition, Weights};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub weights: Weights,
    /// Adds the summed preference ranks to the imbalance.
    pub role_priority_enabled: bool,
    pub max_iterations: usize,
    pub parallel: bool,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            role_priority_enabled: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parallel: true,
        }
    }
}

impl BalanceConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn condition(&self) -> Condition {
        Condition {
            weights: self.weights,
            role_priority: self.role_priority_enabled,
        }
    }

    pub fn params(&self) -> Params {
        Params { max_iterations: self.max_iterations }
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_role_priority(mut self, enabled: bool) -> Self {
        self.role_priority_enabled = enabled;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BalanceConfig::default();
        assert_eq!(config.weights, Weights { tier: 5.0, win_rate: 0.1, role: 0.6 });
        assert!(config.role_priority_enabled);
        assert_eq!(config.max_iterations, 1000);
        assert!(config.parallel);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BalanceConfig::from_json(r#"{"max_iterations": 250, "weights": {"tier": 1.0}}"#).unwrap();
        assert_eq!(config.max_iterations, 250);
        assert_eq!(config.weights.tier, 1.0);
        assert_eq!(config.weights.role, 0.6);
        assert!(config.role_priority_enabled);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(BalanceConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = BalanceConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_builders() {
        let config = BalanceConfig::default().with_role_priority(false).with_max_iterations(10).sequential();
        assert!(!config.condition().role_priority);
        assert_eq!(config.params().max_iterations, 10);
        assert!(!config.parallel);
    }
}
