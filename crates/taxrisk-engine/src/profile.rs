//! Built-in keyword profile and per-category display metadata.

use std::collections::BTreeMap;
use std::path::Path;

use taxrisk_core::entities::{AnalysisSettings, KeywordProfile};

use crate::error::EngineError;

const DEFAULT_CATEGORIES: &[(&str, f64, &[&str])] = &[
    (
        "transfer_pricing",
        1.2,
        &[
            "transfer pricing",
            "intercompany",
            "arm's length",
            "advance pricing agreement",
            "cost sharing",
            "related party transaction",
            "section 482",
            "royalty",
        ],
    ),
    (
        "state_tax",
        1.0,
        &[
            "nexus",
            "apportionment",
            "sales tax",
            "use tax",
            "franchise tax",
            "voluntary disclosure",
            "state income tax",
            "unclaimed property",
        ],
    ),
    (
        "international_tax",
        1.3,
        &[
            "permanent establishment",
            "withholding tax",
            "controlled foreign corporation",
            "gilti",
            "subpart f",
            "base erosion",
            "foreign tax credit",
            "tax treaty",
            "pillar two",
        ],
    ),
    (
        "uncertain_tax_positions",
        1.25,
        &[
            "uncertain tax position",
            "fin 48",
            "unrecognized tax benefit",
            "tax reserve",
            "more likely than not",
            "valuation allowance",
            "asc 740",
        ],
    ),
    (
        "m_and_a_structure",
        1.1,
        &[
            "section 338",
            "section 382",
            "net operating loss",
            "tax-free reorganization",
            "step-up",
            "earnout",
            "successor liability",
            "tax indemnity",
        ],
    ),
    (
        "tax_controversy",
        1.15,
        &[
            "audit",
            "examination",
            "notice of deficiency",
            "proposed assessment",
            "penalty",
            "tax court",
            "appeals",
            "statute of limitations",
            "litigation",
        ],
    ),
];

const RECOMMENDATIONS: &[(&str, [&str; 3])] = &[
    (
        "transfer_pricing",
        [
            "Obtain and review current transfer pricing documentation and benchmarking studies",
            "Confirm intercompany agreements are executed and reflect actual conduct",
            "Quantify exposure from non-arm's-length intercompany charges",
        ],
    ),
    (
        "state_tax",
        [
            "Perform a nexus study covering all jurisdictions with sales or payroll",
            "Review apportionment methodology and filing positions",
            "Consider voluntary disclosure agreements for unfiled jurisdictions",
        ],
    ),
    (
        "international_tax",
        [
            "Map the foreign entity structure and permanent establishment exposure",
            "Review withholding tax compliance on cross-border payments",
            "Model GILTI, Subpart F, and Pillar Two impacts post-closing",
        ],
    ),
    (
        "uncertain_tax_positions",
        [
            "Review the ASC 740 uncertain tax position reserve and supporting memos",
            "Assess whether recognized positions meet the more-likely-than-not threshold",
            "Negotiate specific indemnities for unreserved positions",
        ],
    ),
    (
        "m_and_a_structure",
        [
            "Evaluate Section 382 limitations on acquired tax attributes",
            "Compare asset and stock deal structures, including Section 338 elections",
            "Secure tax indemnities and escrow for pre-closing periods",
        ],
    ),
    (
        "tax_controversy",
        [
            "Obtain all open examination correspondence and proposed assessments",
            "Assess ASC 450 accrual and disclosure for probable or reasonably possible losses",
            "Confirm statute of limitations status for open tax years",
        ],
    ),
];

const GENERIC_RECOMMENDATIONS: [&str; 2] = [
    "Request supporting documentation for the flagged items",
    "Engage tax specialists to quantify the exposure before closing",
];

/// The profile used when no keyword profile is configured.
#[must_use]
pub fn default_profile() -> KeywordProfile {
    let mut risk_keywords = BTreeMap::new();
    let mut risk_weights = BTreeMap::new();
    for (category, weight, keywords) in DEFAULT_CATEGORIES {
        risk_keywords.insert(
            (*category).to_string(),
            keywords.iter().map(|k| (*k).to_string()).collect(),
        );
        risk_weights.insert((*category).to_string(), *weight);
    }
    KeywordProfile {
        risk_keywords,
        risk_weights,
        analysis_settings: AnalysisSettings::default(),
    }
}

/// Load and validate a JSON keyword profile from disk.
///
/// # Errors
///
/// Returns `EngineError::Io` when unreadable and `EngineError::InvalidProfile`
/// when the JSON is malformed or fails [`KeywordProfile::validate`].
pub fn load_profile(path: &Path) -> Result<KeywordProfile, EngineError> {
    let raw = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_profile(&raw)
}

/// Parse and validate a JSON keyword profile.
///
/// # Errors
///
/// Returns `EngineError::InvalidProfile` on malformed JSON or failed validation.
pub fn parse_profile(raw: &str) -> Result<KeywordProfile, EngineError> {
    let profile: KeywordProfile =
        serde_json::from_str(raw).map_err(|e| EngineError::InvalidProfile(e.to_string()))?;
    profile
        .validate()
        .map_err(|e| EngineError::InvalidProfile(e.to_string()))?;
    Ok(profile)
}

/// Display label for a category key.
///
/// Known acronyms are kept; other keys are title-cased word by word.
#[must_use]
pub fn category_label(category: &str) -> String {
    if category == "m_and_a_structure" {
        return "M&A Structure".to_string();
    }
    category
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recommendations for a category flagged at medium or above.
#[must_use]
pub fn recommendations(category: &str) -> Vec<String> {
    RECOMMENDATIONS
        .iter()
        .find(|(name, _)| *name == category)
        .map_or_else(
            || {
                GENERIC_RECOMMENDATIONS
                    .iter()
                    .map(|r| (*r).to_string())
                    .collect()
            },
            |(_, recs)| recs.iter().map(|r| (*r).to_string()).collect(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn default_profile_is_valid() {
        let profile = default_profile();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.risk_keywords.len(), 6);
        assert!((profile.weight("international_tax") - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn every_default_category_has_recommendations() {
        for (category, _, _) in DEFAULT_CATEGORIES {
            assert!(
                RECOMMENDATIONS.iter().any(|(name, _)| name == category),
                "missing recommendations for {category}"
            );
        }
    }

    #[rstest]
    #[case("transfer_pricing", "Transfer Pricing")]
    #[case("m_and_a_structure", "M&A Structure")]
    #[case("uncertain_tax_positions", "Uncertain Tax Positions")]
    #[case("customs", "Customs")]
    fn labels(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(category_label(key), expected);
    }

    #[test]
    fn unknown_category_gets_generic_recommendations() {
        assert_eq!(recommendations("customs").len(), 2);
        assert_eq!(recommendations("state_tax").len(), 3);
    }

    #[test]
    fn parse_profile_rejects_invalid_weights() {
        let raw = r#"{"risk_keywords": {"state_tax": ["nexus"]}, "risk_weights": {"state_tax": -1}}"#;
        let err = parse_profile(raw).unwrap_err();
        assert!(matches!(err, EngineError::InvalidProfile(_)));
    }

    #[test]
    fn load_profile_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        std::fs::write(&path, r#"{"risk_keywords": {"customs": ["tariff"]}}"#).unwrap();
        let profile = load_profile(&path).unwrap();
        assert_eq!(profile.risk_keywords["customs"], vec!["tariff".to_string()]);
    }
}
