//! Risk trend across successive analyses.

use std::collections::BTreeMap;

use taxrisk_core::entities::AnalysisRecord;
use taxrisk_core::enums::TrendDirection;
use taxrisk_core::responses::{HistorySummary, TrendPoint};

use crate::error::EngineError;
use crate::round_to;

/// Fewest analyses for which a trend is reported.
pub const MIN_HISTORY: usize = 2;

/// Slopes smaller than this in magnitude count as stable.
const STABLE_SLOPE: f64 = 1.0;

/// Build the trend line and category frequencies for `records`.
///
/// Records are ordered by `created_at` before fitting.
///
/// # Errors
///
/// Returns `EngineError::InsufficientHistory` for fewer than two records.
pub fn summarize(records: &[AnalysisRecord]) -> Result<HistorySummary, EngineError> {
    if records.len() < MIN_HISTORY {
        return Err(EngineError::InsufficientHistory {
            required: MIN_HISTORY,
            available: records.len(),
        });
    }

    let mut ordered: Vec<&AnalysisRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.created_at);

    let trend: Vec<TrendPoint> = ordered
        .iter()
        .map(|r| TrendPoint {
            timestamp: r.created_at,
            analysis_id: r.id.clone(),
            document_name: r.result.document_name.clone(),
            overall_risk_score: r.result.overall_risk_score,
        })
        .collect();

    let mut category_frequency: BTreeMap<String, u32> = BTreeMap::new();
    for record in &ordered {
        for category in record.result.risk_categories.keys() {
            *category_frequency.entry(category.clone()).or_insert(0) += 1;
        }
    }

    let scores: Vec<f64> = trend.iter().map(|p| p.overall_risk_score).collect();
    let slope = round_to(least_squares_slope(&scores), 3);
    let direction = if slope.abs() < STABLE_SLOPE {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    Ok(HistorySummary {
        trend,
        category_frequency,
        slope,
        direction,
    })
}

/// Slope of the ordinary least-squares line through `(i, ys[i])`.
#[allow(clippy::cast_precision_loss)]
fn least_squares_slope(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n;
    let (num, den) = ys
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - mean_x;
            (dx.mul_add(y - mean_y, num), dx.mul_add(dx, den))
        });
    if den == 0.0 { 0.0 } else { num / den }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RiskEngine;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use taxrisk_core::enums::AnalysisSource;

    fn records(texts: &[&str]) -> Vec<AnalysisRecord> {
        let engine = RiskEngine::with_defaults(100).unwrap();
        let start = Utc::now();
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| AnalysisRecord {
                id: format!("ana-{i:08x}"),
                document_id: format!("doc-{i:08x}"),
                source: AnalysisSource::Upload,
                result: engine.analyze(&format!("doc{i}.txt"), text, 0.0).unwrap(),
                created_at: start + Duration::minutes(i64::try_from(i).unwrap()),
            })
            .collect()
    }

    #[test]
    fn single_record_is_insufficient() {
        let err = summarize(&records(&["nexus"])).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientHistory {
                required: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn rising_scores_trend_upward() {
        let mut input = records(&[
            "Nexus exists.",
            "Nexus and apportionment.",
            "Nexus, apportionment, sales tax.",
        ]);
        input.reverse();
        let summary = summarize(&input).unwrap();

        let scores: Vec<f64> = summary.trend.iter().map(|p| p.overall_risk_score).collect();
        assert_eq!(scores, vec![10.0, 20.0, 30.0]);
        assert!((summary.slope - 10.0).abs() < 1e-9);
        assert_eq!(summary.direction, TrendDirection::Increasing);
        assert_eq!(summary.category_frequency["state_tax"], 3);
    }

    #[test]
    fn flat_scores_are_stable() {
        let summary = summarize(&records(&["Nexus exists.", "Apportionment only."])).unwrap();
        assert!(summary.slope.abs() < f64::EPSILON);
        assert_eq!(summary.direction, TrendDirection::Stable);
    }

    #[test]
    fn slope_of_falling_series() {
        assert!((least_squares_slope(&[30.0, 20.0, 10.0]) + 10.0).abs() < 1e-9);
    }
}
