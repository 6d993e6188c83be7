//! Quarterly penalty / late-filing volatility model configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_penalty_weight() -> f64 {
    0.6
}

const fn default_late_weight() -> f64 {
    0.4
}

const fn default_flag_threshold() -> f64 {
    0.25
}

const fn default_forecast_steps() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuarterlyConfig {
    /// Weight of penalty volatility in the combined score.
    #[serde(default = "default_penalty_weight")]
    pub penalty_weight: f64,

    /// Weight of late-return volatility in the combined score.
    #[serde(default = "default_late_weight")]
    pub late_weight: f64,

    /// Scores strictly above this raise the risk flag.
    #[serde(default = "default_flag_threshold")]
    pub flag_threshold: f64,

    /// Quarters forecast ahead.
    #[serde(default = "default_forecast_steps")]
    pub forecast_steps: usize,
}

impl Default for QuarterlyConfig {
    fn default() -> Self {
        Self {
            penalty_weight: default_penalty_weight(),
            late_weight: default_late_weight(),
            flag_threshold: default_flag_threshold(),
            forecast_steps: default_forecast_steps(),
        }
    }
}

impl QuarterlyConfig {
    /// Check that weights are non-negative and sum to one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.penalty_weight < 0.0
            || self.late_weight < 0.0
            || ((self.penalty_weight + self.late_weight) - 1.0).abs() > 1e-9
        {
            return Err(ConfigError::InvalidValue {
                field: "quarterly.penalty_weight/late_weight".into(),
                reason: format!(
                    "weights must be non-negative and sum to 1, got {} + {}",
                    self.penalty_weight, self.late_weight
                ),
            });
        }
        if self.forecast_steps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "quarterly.forecast_steps".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
