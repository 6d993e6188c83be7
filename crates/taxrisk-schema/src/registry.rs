//! Central schema registry for taxrisk types.
//!
//! The `SchemaRegistry` builds JSON Schemas from taxrisk-core types at
//! construction time using [`schemars::schema_for!`] and provides validation
//! via `jsonschema`.

use std::collections::HashMap;

use schemars::schema_for;

use crate::error::SchemaError;

/// Central store of the JSON Schemas taxrisk validates against.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`. Panics if `serde_json::to_value` fails (should be
/// infallible for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a new registry containing entity, envelope, profile, and
    /// response schemas from taxrisk-core.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on any `schemars`-generated
    /// schema. This is not expected in practice because `schemars` always
    /// produces valid JSON-serialisable output.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Entities ---
        register!(schemas, "document", taxrisk_core::entities::Document);
        register!(
            schemas,
            "analysis_result",
            taxrisk_core::entities::AnalysisResult
        );
        register!(
            schemas,
            "analysis_record",
            taxrisk_core::entities::AnalysisRecord
        );
        register!(schemas, "audit_entry", taxrisk_core::entities::AuditEntry);
        register!(
            schemas,
            "keyword_profile",
            taxrisk_core::entities::KeywordProfile
        );

        // --- Export envelope ---
        register!(
            schemas,
            "export_envelope",
            taxrisk_core::export::ExportEnvelope
        );

        // --- Responses ---
        register!(
            schemas,
            "dashboard_summary",
            taxrisk_core::responses::DashboardSummary
        );
        register!(
            schemas,
            "history_summary",
            taxrisk_core::responses::HistorySummary
        );

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    #[test]
    fn registry_has_expected_count() {
        assert_eq!(registry().schema_count(), 8);
    }

    #[test]
    fn registry_list_is_sorted() {
        let names = registry().list();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn get_nonexistent_schema() {
        assert!(registry().get("nonexistent").is_none());
    }

    #[test]
    fn validate_valid_keyword_profile() {
        let profile = serde_json::json!({
            "risk_keywords": {
                "transfer_pricing": ["transfer pricing", "intercompany", "arm's length"],
                "state_tax": ["nexus", "apportionment", "sales tax"]
            },
            "risk_weights": { "transfer_pricing": 1.2, "state_tax": 1.0 },
            "analysis_settings": { "min_keyword_length": 3, "context_window": 100 }
        });
        assert!(registry().validate("keyword_profile", &profile).is_ok());
    }

    #[test]
    fn validate_rejects_profile_without_keywords() {
        let invalid = serde_json::json!({ "risk_weights": { "state_tax": 1.0 } });
        let result = registry().validate("keyword_profile", &invalid);
        if let Err(SchemaError::ValidationFailed { errors }) = result {
            assert!(!errors.is_empty());
        } else {
            panic!("Expected ValidationFailed");
        }
    }

    #[test]
    fn validate_rejects_non_numeric_weight() {
        let invalid = serde_json::json!({
            "risk_keywords": { "state_tax": ["nexus"] },
            "risk_weights": { "state_tax": "high" }
        });
        assert!(registry().validate("keyword_profile", &invalid).is_err());
    }

    #[test]
    fn validate_rejects_envelope_without_results() {
        let invalid = serde_json::json!({
            "metadata": {
                "timestamp": "2026-01-01T12:00:00Z",
                "app_version": "1.0",
                "analysis_type": "tax_risk_assessment"
            }
        });
        assert!(registry().validate("export_envelope", &invalid).is_err());
    }

    #[test]
    fn validate_nonexistent_schema_returns_not_found() {
        let result = registry().validate("bogus", &serde_json::json!({}));
        assert!(matches!(result, Err(SchemaError::NotFound(_))));
    }
}
