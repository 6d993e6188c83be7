use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{
    AnalysisSource, AnalysisStatus, ComplianceLevel, ComplianceStandard, RiskLevel,
};

/// A configured keyword found in a document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct KeywordHit {
    pub keyword: String,
    pub category: String,
    pub occurrences: u32,
    /// Text surrounding the first occurrence.
    pub context: String,
}

/// Scored result for one risk category.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CategoryAssessment {
    pub category: String,
    pub label: String,
    /// 0-100.
    pub score: f64,
    pub risk_level: RiskLevel,
    /// Percent.
    pub confidence: f64,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Probability (percent) of a tax authority examination.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AuditProbability {
    #[serde(rename = "12_month")]
    pub twelve_month: f64,
    #[serde(rename = "36_month")]
    pub thirty_six_month: f64,
}

/// Expected tax contingency (ASC 450) in currency units.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TaxContingency {
    pub mean: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Whether the deal escrow covers the high-percentile contingency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EscrowAdequacy {
    pub recommended: f64,
    pub current: f64,
    pub adequate: bool,
    pub shortfall: f64,
}

/// Compliance verdict for one standard.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StandardAssessment {
    pub standard: ComplianceStandard,
    pub compliance_level: ComplianceLevel,
    pub issues: Vec<String>,
}

/// Full output of a document risk analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalysisResult {
    pub document_name: String,
    /// Leading excerpt of the extracted text.
    pub document_text: String,
    pub text_length: u64,
    pub word_count: u64,
    pub analysis_status: AnalysisStatus,
    pub found_keywords: Vec<KeywordHit>,
    pub flagged_keywords: Vec<String>,
    pub risk_categories: BTreeMap<String, CategoryAssessment>,
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    pub audit_probability: AuditProbability,
    pub expected_tax_contingency: TaxContingency,
    pub escrow_adequacy: EscrowAdequacy,
    pub compliance_assessment: BTreeMap<ComplianceStandard, StandardAssessment>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Categories ordered by descending score.
    #[must_use]
    pub fn categories_by_score(&self) -> Vec<&CategoryAssessment> {
        let mut categories: Vec<&CategoryAssessment> = self.risk_categories.values().collect();
        categories.sort_by(|a, b| b.score.total_cmp(&a.score));
        categories
    }
}

/// A persisted analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalysisRecord {
    pub id: String,
    pub document_id: String,
    pub source: AnalysisSource,
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}
