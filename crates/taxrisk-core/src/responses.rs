//! Aggregate response types returned by the dashboard and history views.
//!
//! These structs define the JSON shape shared by `taxrisk dashboard`,
//! `taxrisk history`, and the matching HTTP endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AnalysisRecord, Document};
use crate::enums::{RiskLevel, TrendDirection};

/// Per-category rollup across all stored analyses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CategoryTotals {
    pub analyses: u32,
    pub average_score: f64,
    pub max_level: RiskLevel,
}

/// Response from `taxrisk dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DashboardSummary {
    pub total_analyses: u32,
    pub average_score: f64,
    pub max_score: f64,
    pub by_risk_level: BTreeMap<RiskLevel, u32>,
    pub category_totals: BTreeMap<String, CategoryTotals>,
    pub total_expected_contingency: f64,
    pub escrow_shortfalls: u32,
}

/// One point on the risk score trend line.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub analysis_id: String,
    pub document_name: String,
    pub overall_risk_score: f64,
}

/// Response from `taxrisk history`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HistorySummary {
    pub trend: Vec<TrendPoint>,
    pub category_frequency: BTreeMap<String, u32>,
    /// Least-squares change in score per analysis.
    pub slope: f64,
    pub direction: TrendDirection,
}

/// Response from `taxrisk analysis list`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalysisListResponse {
    pub analyses: Vec<AnalysisRecord>,
}

/// Response from `taxrisk clear`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClearResponse {
    pub analyses_removed: u64,
    pub documents_removed: u64,
}

/// Response from `taxrisk import`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportResponse {
    pub imported: Vec<String>,
    pub skipped: u32,
}

/// One full-text search match from `taxrisk search`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DocumentSearchHit {
    pub document: Document,
    /// Latest analysis of the document, if any.
    pub analysis_id: Option<String>,
    /// Matched text with hits wrapped in `[` and `]`.
    pub snippet: String,
}
