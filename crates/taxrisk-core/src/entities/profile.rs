use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const fn default_min_keyword_length() -> usize {
    3
}

const fn default_context_window() -> usize {
    100
}

/// Keyword matching knobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Keywords shorter than this (in chars) are ignored.
    #[serde(default = "default_min_keyword_length")]
    pub min_keyword_length: usize,
    /// Chars of surrounding text captured on each side of a match.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_keyword_length: default_min_keyword_length(),
            context_window: default_context_window(),
        }
    }
}

/// Risk keywords and weights per category, in the portable JSON format.
///
/// ```json
/// {
///   "risk_keywords": { "transfer_pricing": ["transfer pricing", "intercompany"] },
///   "risk_weights": { "transfer_pricing": 1.2 },
///   "analysis_settings": { "min_keyword_length": 3, "context_window": 100 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct KeywordProfile {
    pub risk_keywords: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub risk_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub analysis_settings: AnalysisSettings,
}

impl KeywordProfile {
    /// Weight for a category; categories without an explicit weight count as 1.0.
    #[must_use]
    pub fn weight(&self, category: &str) -> f64 {
        self.risk_weights.get(category).copied().unwrap_or(1.0)
    }

    /// Check structural constraints that JSON Schema cannot express.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` describing the first violated rule.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.risk_keywords.is_empty() {
            return Err(CoreError::Validation(
                "risk_keywords must define at least one category".into(),
            ));
        }
        for (category, keywords) in &self.risk_keywords {
            if category.trim().is_empty() {
                return Err(CoreError::Validation("category names must not be empty".into()));
            }
            if keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(CoreError::Validation(format!(
                    "category '{category}' has no keywords"
                )));
            }
        }
        for (category, weight) in &self.risk_weights {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(CoreError::Validation(format!(
                    "weight for '{category}' must be a positive number, got {weight}"
                )));
            }
        }
        if self.analysis_settings.min_keyword_length == 0 {
            return Err(CoreError::Validation(
                "analysis_settings.min_keyword_length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
