//! Audit probability, ASC 450 contingency, and escrow adequacy.

use std::collections::BTreeMap;

use taxrisk_config::EngineConfig;
use taxrisk_core::entities::{
    AuditProbability, CategoryAssessment, EscrowAdequacy, KeywordProfile, TaxContingency,
};

use crate::round_to;

/// Standard normal quantile at 0.75.
const Z_P75: f64 = 0.6745;
/// Standard normal quantile at 0.90.
const Z_P90: f64 = 1.2816;

const MAX_ANNUAL_AUDIT_PROBABILITY: f64 = 0.95;

/// Examination probability over 12 and 36 months for an overall risk score.
#[must_use]
pub fn audit_probability(overall_score: f64, config: &EngineConfig) -> AuditProbability {
    let annual = config
        .max_audit_uplift
        .mul_add(overall_score / 100.0, config.base_annual_audit_rate)
        .clamp(0.0, MAX_ANNUAL_AUDIT_PROBABILITY);
    AuditProbability {
        twelve_month: round_to(annual * 100.0, 1),
        thirty_six_month: round_to((1.0 - (1.0 - annual).powi(3)) * 100.0, 1),
    }
}

/// Expected contingency with lognormal upper percentiles.
///
/// Each matched category contributes its share of total profile weight,
/// scaled by its score and the 36-month audit probability.
#[must_use]
pub fn expected_contingency(
    categories: &BTreeMap<String, CategoryAssessment>,
    profile: &KeywordProfile,
    audit: &AuditProbability,
    config: &EngineConfig,
) -> TaxContingency {
    let total_weight: f64 = profile
        .risk_keywords
        .keys()
        .map(|c| profile.weight(c))
        .sum();
    if total_weight <= 0.0 {
        return TaxContingency::default();
    }

    let weighted_score: f64 = categories
        .values()
        .map(|c| profile.weight(&c.category) / total_weight * (c.score / 100.0))
        .sum();
    let mean = config.exposure_base * weighted_score * (audit.thirty_six_month / 100.0);
    if mean <= 0.0 {
        return TaxContingency::default();
    }

    let sigma = config.contingency_sigma;
    let mu = mean.ln() - sigma * sigma / 2.0;
    TaxContingency {
        mean: round_to(mean, 2),
        p75: round_to(sigma.mul_add(Z_P75, mu).exp(), 2),
        p90: round_to(sigma.mul_add(Z_P90, mu).exp(), 2),
    }
}

/// Compare the current escrow against the P90 contingency.
#[must_use]
pub fn escrow_adequacy(contingency: &TaxContingency, current: f64) -> EscrowAdequacy {
    let recommended = contingency.p90;
    EscrowAdequacy {
        recommended,
        current,
        adequate: current >= recommended,
        shortfall: round_to((recommended - current).max(0.0), 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::default_profile;
    use taxrisk_core::enums::RiskLevel;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn assessment(category: &str, score: f64) -> CategoryAssessment {
        CategoryAssessment {
            category: category.into(),
            label: category.into(),
            score,
            risk_level: RiskLevel::Low,
            confidence: 55.0,
            keywords: vec![],
            recommendations: vec![],
        }
    }

    #[test]
    fn zero_score_uses_base_rate() {
        let p = audit_probability(0.0, &EngineConfig::default());
        assert!(close(p.twelve_month, 5.0, 1e-9));
        assert!(close(p.thirty_six_month, 14.3, 1e-9));
    }

    #[test]
    fn full_score_is_capped() {
        let p = audit_probability(100.0, &EngineConfig::default());
        assert!(close(p.twelve_month, 50.0, 1e-9));
        assert!(close(p.thirty_six_month, 87.5, 1e-9));

        let aggressive = EngineConfig {
            max_audit_uplift: 2.0,
            ..EngineConfig::default()
        };
        assert!(close(audit_probability(100.0, &aggressive).twelve_month, 95.0, 1e-9));
    }

    #[test]
    fn no_categories_means_no_contingency() {
        let config = EngineConfig::default();
        let audit = audit_probability(0.0, &config);
        let c = expected_contingency(&BTreeMap::new(), &default_profile(), &audit, &config);
        assert_eq!(c, TaxContingency::default());
    }

    #[test]
    fn contingency_percentiles_exceed_mean() {
        let config = EngineConfig::default();
        let profile = default_profile();
        let categories =
            BTreeMap::from([("state_tax".to_string(), assessment("state_tax", 50.0))]);
        let audit = AuditProbability {
            twelve_month: 27.5,
            thirty_six_month: 50.0,
        };
        let c = expected_contingency(&categories, &profile, &audit, &config);

        // state_tax weight 1.0 of 7.0 total.
        let expected_mean = 1_000_000.0 * (1.0 / 7.0) * 0.5 * 0.5;
        assert!(close(c.mean, expected_mean, 0.01));
        assert!(close(c.p75, expected_mean * (-0.125_f64 + 0.5 * 0.6745).exp(), 0.01));
        assert!(close(c.p90, expected_mean * (-0.125_f64 + 0.5 * 1.2816).exp(), 0.01));
        assert!(c.p90 > c.p75 && c.p75 > c.mean);
    }

    #[test]
    fn escrow_shortfall() {
        let c = TaxContingency {
            mean: 100.0,
            p75: 120.0,
            p90: 150.0,
        };
        let short = escrow_adequacy(&c, 100.0);
        assert!(!short.adequate);
        assert!(close(short.shortfall, 50.0, 1e-9));

        let covered = escrow_adequacy(&c, 150.0);
        assert!(covered.adequate);
        assert!(close(covered.shortfall, 0.0, 1e-9));
    }
}
