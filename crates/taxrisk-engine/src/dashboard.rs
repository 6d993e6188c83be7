//! Portfolio rollup across stored analyses.

use std::collections::BTreeMap;

use taxrisk_core::entities::AnalysisRecord;
use taxrisk_core::enums::RiskLevel;
use taxrisk_core::responses::{CategoryTotals, DashboardSummary};

use crate::round_to;

#[derive(Default)]
struct CategoryAccumulator {
    analyses: u32,
    score_sum: f64,
    max_level: Option<RiskLevel>,
}

/// Summarize `records`. An empty slice produces an all-zero summary.
#[must_use]
pub fn summarize(records: &[AnalysisRecord]) -> DashboardSummary {
    let mut by_risk_level: BTreeMap<RiskLevel, u32> = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ]
    .into_iter()
    .map(|level| (level, 0))
    .collect();

    let mut categories: BTreeMap<String, CategoryAccumulator> = BTreeMap::new();
    let mut score_sum = 0.0;
    let mut max_score: f64 = 0.0;
    let mut total_expected_contingency = 0.0;
    let mut escrow_shortfalls = 0;

    for record in records {
        let result = &record.result;
        *by_risk_level.entry(result.risk_level).or_insert(0) += 1;
        score_sum += result.overall_risk_score;
        max_score = max_score.max(result.overall_risk_score);
        total_expected_contingency += result.expected_tax_contingency.mean;
        if !result.escrow_adequacy.adequate {
            escrow_shortfalls += 1;
        }

        for (name, assessment) in &result.risk_categories {
            let acc = categories.entry(name.clone()).or_default();
            acc.analyses += 1;
            acc.score_sum += assessment.score;
            acc.max_level = acc.max_level.max(Some(assessment.risk_level));
        }
    }

    let total_analyses = u32::try_from(records.len()).unwrap_or(u32::MAX);
    let average_score = if total_analyses == 0 {
        0.0
    } else {
        round_to(score_sum / f64::from(total_analyses), 2)
    };

    let category_totals = categories
        .into_iter()
        .map(|(name, acc)| {
            (
                name,
                CategoryTotals {
                    analyses: acc.analyses,
                    average_score: round_to(acc.score_sum / f64::from(acc.analyses), 2),
                    max_level: acc.max_level.unwrap_or(RiskLevel::Low),
                },
            )
        })
        .collect();

    DashboardSummary {
        total_analyses,
        average_score,
        max_score,
        by_risk_level,
        category_totals,
        total_expected_contingency: round_to(total_expected_contingency, 2),
        escrow_shortfalls,
    }
}
