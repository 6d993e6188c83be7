//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! provide schema validation for the most common detail shapes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::Created` and `AuditAction::Imported` on analyses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalysisRecordedDetail {
    pub document_id: String,
    pub document_name: String,
    pub overall_risk_score: f64,
    pub risk_level: String,
}

/// Detail for `AuditAction::Cleared`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClearedDetail {
    pub analyses: u64,
    pub documents: u64,
}

/// Detail for `AuditAction::ConfigApplied`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ConfigAppliedDetail {
    pub path: String,
    pub categories: Vec<String>,
}

/// Detail for `AuditAction::Exported`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportedDetail {
    pub destination: Option<String>,
}
