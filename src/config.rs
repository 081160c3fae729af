use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Process-level knobs, read from the environment.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub model_config_path: String,
    /// Tolerance for stochastic-matrix checks and posterior normalisation.
    pub tolerance: f64,
    /// Poll interval for config file changes in the process loop (0 = off).
    pub reload_poll_secs: u64,
    /// Reject a reload outright when any typology in it fails validation.
    pub strict_reload: bool,
    /// Serve built-in defaults for core typologies missing from the document.
    pub serve_defaults: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_config_path: "config/models.json".to_string(),
            tolerance: 1e-3,
            reload_poll_secs: 0,
            strict_reload: true,
            serve_defaults: true,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model_config_path: std::env::var("MODEL_CONFIG_PATH").unwrap_or(defaults.model_config_path),
            tolerance: std::env::var("PROB_TOLERANCE").ok().and_then(|v| v.parse().ok()).unwrap_or(defaults.tolerance),
            reload_poll_secs: std::env::var("RELOAD_POLL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(defaults.reload_poll_secs),
            strict_reload: std::env::var("STRICT_RELOAD").map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes")).unwrap_or(defaults.strict_reload),
            serve_defaults: std::env::var("SERVE_DEFAULTS").map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes")).unwrap_or(defaults.serve_defaults),
        }
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            model_config_path: path.into(),
            ..Self::default()
        }
    }
}

/// Cut points mapping a scalar score to a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub low_risk: f64,
    pub medium_risk: f64,
    pub high_risk: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_risk: 0.3,
            medium_risk: 0.6,
            high_risk: 0.8,
        }
    }
}

impl RiskThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 <= self.low_risk
            && self.low_risk <= self.medium_risk
            && self.medium_risk <= self.high_risk
            && self.high_risk <= 1.0;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::Settings(format!(
                "risk thresholds must satisfy 0 <= low <= medium <= high <= 1, got {:?}",
                self
            )))
        }
    }
}

/// Document-wide defaults shared by every typology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Fallback for nodes that declare none. Empty means uniform; a vector of
    /// the wrong length for a node also degrades to uniform for that node.
    pub default_fallback_prior: Vec<f64>,
    pub risk_thresholds: RiskThresholds,
    /// Score multipliers applied when a context flag explains the activity.
    pub context_multipliers: BTreeMap<String, f64>,
    pub min_signal_confidence: f64,
    pub default_importance: f64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        let context_multipliers = [
            ("public_news", 0.5),
            ("market_wide_move", 0.7),
            ("sector_move", 0.85),
            ("scheduled_rebalancing", 0.8),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            default_fallback_prior: Vec::new(),
            risk_thresholds: RiskThresholds::default(),
            context_multipliers,
            min_signal_confidence: 0.5,
            default_importance: 1.0,
        }
    }
}

impl GlobalSettings {
    pub fn validate(&self, tolerance: f64) -> Result<(), ConfigError> {
        self.risk_thresholds.validate()?;

        if !self.default_fallback_prior.is_empty() {
            if self.default_fallback_prior.iter().any(|p| !p.is_finite() || *p < 0.0) {
                return Err(ConfigError::Settings(
                    "default_fallback_prior holds a negative or non-finite entry".to_string(),
                ));
            }
            let sum: f64 = self.default_fallback_prior.iter().sum();
            if (sum - 1.0).abs() > tolerance {
                return Err(ConfigError::Settings(format!(
                    "default_fallback_prior sums to {:.6}",
                    sum
                )));
            }
        }

        for (flag, mult) in &self.context_multipliers {
            if !(0.0..=1.0).contains(mult) {
                return Err(ConfigError::Settings(format!(
                    "context multiplier `{}` = {} must lie in [0, 1]",
                    flag, mult
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.min_signal_confidence) {
            return Err(ConfigError::Settings(format!(
                "min_signal_confidence {} must lie in [0, 1]",
                self.min_signal_confidence
            )));
        }

        if !self.default_importance.is_finite() || self.default_importance < 0.0 {
            return Err(ConfigError::Settings(format!(
                "default_importance {} must be finite and non-negative",
                self.default_importance
            )));
        }
        Ok(())
    }

    /// Fallback prior for a node with `states` states that declares none.
    pub fn fallback_for(&self, states: usize) -> Vec<f64> {
        if self.default_fallback_prior.len() == states {
            self.default_fallback_prior.clone()
        } else {
            vec![1.0 / states as f64; states]
        }
    }
}
