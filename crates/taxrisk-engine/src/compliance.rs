//! Mapping of risk categories onto accounting and tax standards.

use std::collections::BTreeMap;

use taxrisk_core::entities::{CategoryAssessment, StandardAssessment};
use taxrisk_core::enums::{ComplianceLevel, ComplianceStandard, RiskLevel};

/// Categories whose findings bear on `standard`.
#[must_use]
pub const fn related_categories(standard: ComplianceStandard) -> &'static [&'static str] {
    match standard {
        ComplianceStandard::Asc740 => &["uncertain_tax_positions", "international_tax", "state_tax"],
        ComplianceStandard::Asc450 => &["tax_controversy", "uncertain_tax_positions"],
        ComplianceStandard::Asc805 => &["m_and_a_structure"],
        ComplianceStandard::IrsCircular230 => &["tax_controversy"],
        ComplianceStandard::OecdTpGuidelines => &["transfer_pricing"],
    }
}

/// Assess every standard against the matched categories.
///
/// A standard takes the worst level among its related categories; one issue
/// line is listed per related category at medium or above.
#[must_use]
pub fn assess(
    categories: &BTreeMap<String, CategoryAssessment>,
) -> BTreeMap<ComplianceStandard, StandardAssessment> {
    ComplianceStandard::ALL
        .into_iter()
        .map(|standard| {
            let related: Vec<&CategoryAssessment> = related_categories(standard)
                .iter()
                .filter_map(|name| categories.get(*name))
                .collect();

            let worst = related.iter().map(|c| c.risk_level).max();
            let issues = related
                .iter()
                .filter(|c| c.risk_level >= RiskLevel::Medium)
                .map(|c| {
                    format!(
                        "{} risk is {} (score {:.1})",
                        c.label,
                        c.risk_level.label().to_lowercase(),
                        c.score
                    )
                })
                .collect();

            (
                standard,
                StandardAssessment {
                    standard,
                    compliance_level: ComplianceLevel::from_risk(worst),
                    issues,
                },
            )
        })
        .collect()
}
