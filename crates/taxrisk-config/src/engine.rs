//! Risk engine configuration.
//!
//! Keyword lists and weights live in a separate JSON keyword profile (see
//! `taxrisk_core::entities::KeywordProfile`); this section only points at it
//! and holds the numeric model parameters.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_exposure_base() -> f64 {
    1_000_000.0
}

const fn default_base_annual_audit_rate() -> f64 {
    0.05
}

const fn default_max_audit_uplift() -> f64 {
    0.45
}

const fn default_contingency_sigma() -> f64 {
    0.5
}

const fn default_medium_threshold() -> f64 {
    30.0
}

const fn default_high_threshold() -> f64 {
    60.0
}

const fn default_critical_threshold() -> f64 {
    85.0
}

/// 10 MiB.
const fn default_max_document_bytes() -> u64 {
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Path to a JSON keyword profile. Relative paths resolve against the
    /// project root. Empty means the built-in profile.
    #[serde(default)]
    pub keyword_profile: String,

    /// Potential tax exposure of the target, in currency units.
    #[serde(default = "default_exposure_base")]
    pub exposure_base: f64,

    /// Annual examination probability for a document with no risk indicators.
    #[serde(default = "default_base_annual_audit_rate")]
    pub base_annual_audit_rate: f64,

    /// Additional annual probability at a risk score of 100.
    #[serde(default = "default_max_audit_uplift")]
    pub max_audit_uplift: f64,

    /// Log-space standard deviation of the contingency distribution.
    #[serde(default = "default_contingency_sigma")]
    pub contingency_sigma: f64,

    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: f64,

    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,

    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: f64,

    /// Largest document accepted for analysis.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            keyword_profile: String::new(),
            exposure_base: default_exposure_base(),
            base_annual_audit_rate: default_base_annual_audit_rate(),
            max_audit_uplift: default_max_audit_uplift(),
            contingency_sigma: default_contingency_sigma(),
            medium_threshold: default_medium_threshold(),
            high_threshold: default_high_threshold(),
            critical_threshold: default_critical_threshold(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl EngineConfig {
    /// Whether a custom keyword profile is configured.
    #[must_use]
    pub fn has_keyword_profile(&self) -> bool {
        !self.keyword_profile.is_empty()
    }

    /// Resolve the keyword profile path against `project_root`.
    #[must_use]
    pub fn keyword_profile_path(&self, project_root: &Path) -> Option<PathBuf> {
        if !self.has_keyword_profile() {
            return None;
        }
        let path = PathBuf::from(&self.keyword_profile);
        if path.is_absolute() {
            Some(path)
        } else {
            Some(project_root.join(path))
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: String| ConfigError::InvalidValue {
            field: format!("engine.{field}"),
            reason,
        };

        if !(self.exposure_base.is_finite() && self.exposure_base >= 0.0) {
            return Err(invalid(
                "exposure_base",
                format!("must be a non-negative number, got {}", self.exposure_base),
            ));
        }
        for (field, rate) in [
            ("base_annual_audit_rate", self.base_annual_audit_rate),
            ("max_audit_uplift", self.max_audit_uplift),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(invalid(field, format!("must be within 0..=1, got {rate}")));
            }
        }
        if !(self.contingency_sigma.is_finite() && self.contingency_sigma > 0.0) {
            return Err(invalid(
                "contingency_sigma",
                format!("must be positive, got {}", self.contingency_sigma),
            ));
        }
        if !(0.0 < self.medium_threshold
            && self.medium_threshold < self.high_threshold
            && self.high_threshold < self.critical_threshold
            && self.critical_threshold <= 100.0)
        {
            return Err(invalid(
                "thresholds",
                format!(
                    "expected 0 < medium < high < critical <= 100, got {} / {} / {}",
                    self.medium_threshold, self.high_threshold, self.critical_threshold
                ),
            ));
        }
        if self.max_document_bytes == 0 {
            return Err(invalid("max_document_bytes", "must be positive".into()));
        }
        Ok(())
    }
}
