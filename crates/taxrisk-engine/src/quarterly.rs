//! Quarterly penalty and late-filing risk model.
//!
//! Each series gets an ARIMA(1,1,1) forecast; the combined risk score weighs
//! the volatility (sample standard deviation of quarter-over-quarter
//! percentage changes) of both series.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taxrisk_config::QuarterlyConfig;

use crate::arima::Arima111;
use crate::error::EngineError;
use crate::round_to;

/// Fewest quarters the model accepts.
pub const MIN_QUARTERS: usize = 3;

/// Request body for a quarterly assessment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuarterlyRiskInput {
    /// Consecutive quarters such as `"2023-Q1"`.
    pub quarters: Vec<String>,
    pub penalty_per_year: Vec<f64>,
    pub percent_returns_late: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuarterlyRiskOutput {
    pub forecast_quarters: Vec<String>,
    pub penalty_forecast_next_2_quarters: Vec<f64>,
    pub late_pct_forecast_next_2_quarters: Vec<f64>,
    pub risk_score: f64,
    pub risk_flag: bool,
}

/// A calendar quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u8,
}

impl Quarter {
    fn ordinal(self) -> i64 {
        i64::from(self.year) * 4 + i64::from(self.quarter) - 1
    }

    /// The following quarter, or `None` past the last representable year.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if self.quarter == 4 {
            match self.year.checked_add(1) {
                Some(year) => Some(Self { year, quarter: 1 }),
                None => None,
            }
        } else {
            Some(Self {
                year: self.year,
                quarter: self.quarter + 1,
            })
        }
    }
}

impl FromStr for Quarter {
    type Err = EngineError;

    /// Accepts `2023-Q1`, `2023Q1`, and lowercase `q`. The year is exactly
    /// four ASCII digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidInput(format!("'{s}' is not a quarter like 2023-Q1"));
        let upper = s.trim().to_ascii_uppercase();
        let (year, quarter) = upper.split_once('Q').ok_or_else(invalid)?;
        let year = year.strip_suffix('-').unwrap_or(year);
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let quarter: u8 = quarter.parse().map_err(|_| invalid())?;
        if !(1..=4).contains(&quarter) {
            return Err(invalid());
        }
        Ok(Self { year, quarter })
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

/// Run the quarterly model.
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` when series lengths differ, fewer than
/// three quarters are given, quarters are malformed or not consecutive, a
/// value is not finite, or a zero value makes a percentage change undefined.
pub fn assess(
    input: &QuarterlyRiskInput,
    config: &QuarterlyConfig,
) -> Result<QuarterlyRiskOutput, EngineError> {
    let last = validate(input)?;

    let (penalty_model, late_model) = match (
        Arima111::fit(&input.penalty_per_year),
        Arima111::fit(&input.percent_returns_late),
    ) {
        (Some(p), Some(l)) => (p, l),
        _ => {
            return Err(EngineError::InvalidInput(format!(
                "at least {MIN_QUARTERS} quarters are required"
            )));
        }
    };
    tracing::debug!(
        penalty_phi = penalty_model.phi,
        penalty_theta = penalty_model.theta,
        late_phi = late_model.phi,
        late_theta = late_model.theta,
        "fitted quarterly models"
    );

    let volatility_penalty = pct_change_std("penalty_per_year", &input.penalty_per_year)?;
    let volatility_late = pct_change_std("percent_returns_late", &input.percent_returns_late)?;
    let raw_score = config
        .penalty_weight
        .mul_add(volatility_penalty, config.late_weight * volatility_late);

    let forecast_quarters = std::iter::successors(last.next(), |q| q.next())
        .take(config.forecast_steps)
        .map(|q| q.to_string())
        .collect();

    Ok(QuarterlyRiskOutput {
        forecast_quarters,
        penalty_forecast_next_2_quarters: penalty_model.forecast(config.forecast_steps),
        late_pct_forecast_next_2_quarters: late_model.forecast(config.forecast_steps),
        risk_score: round_to(raw_score, 3),
        risk_flag: raw_score > config.flag_threshold,
    })
}

/// Check shape and ordering; returns the final quarter.
fn validate(input: &QuarterlyRiskInput) -> Result<Quarter, EngineError> {
    let n = input.quarters.len();
    if input.penalty_per_year.len() != n || input.percent_returns_late.len() != n {
        return Err(EngineError::InvalidInput(format!(
            "series lengths differ: {n} quarters, {} penalty values, {} late-return values",
            input.penalty_per_year.len(),
            input.percent_returns_late.len()
        )));
    }
    if n < MIN_QUARTERS {
        return Err(EngineError::InvalidInput(format!(
            "at least {MIN_QUARTERS} quarters are required, got {n}"
        )));
    }
    if let Some(bad) = input
        .penalty_per_year
        .iter()
        .chain(&input.percent_returns_late)
        .find(|v| !v.is_finite())
    {
        return Err(EngineError::InvalidInput(format!(
            "values must be finite numbers, got {bad}"
        )));
    }

    let quarters = input
        .quarters
        .iter()
        .map(|q| q.parse::<Quarter>())
        .collect::<Result<Vec<_>, _>>()?;
    for pair in quarters.windows(2) {
        if pair[1].ordinal() != pair[0].ordinal() + 1 {
            return Err(EngineError::InvalidInput(format!(
                "quarters must be consecutive: {} is followed by {}",
                pair[0], pair[1]
            )));
        }
    }
    quarters
        .last()
        .copied()
        .ok_or_else(|| EngineError::InvalidInput("no quarters given".into()))
}

/// Sample standard deviation of period-over-period percentage changes.
#[allow(clippy::cast_precision_loss)]
fn pct_change_std(name: &str, series: &[f64]) -> Result<f64, EngineError> {
    let changes = series
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                Err(EngineError::InvalidInput(format!(
                    "{name} contains a zero value, percentage change is undefined"
                )))
            } else {
                Ok((w[1] - w[0]) / w[0])
            }
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let n = changes.len() as f64;
    let mean = changes.iter().sum::<f64>() / n;
    let variance = changes
        .iter()
        .map(|c| (c - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    Ok(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn input(quarters: &[&str], penalty: &[f64], late: &[f64]) -> QuarterlyRiskInput {
        QuarterlyRiskInput {
            quarters: quarters.iter().map(|q| (*q).to_string()).collect(),
            penalty_per_year: penalty.to_vec(),
            percent_returns_late: late.to_vec(),
        }
    }

    #[rstest]
    #[case("2023-Q1", 2023, 1)]
    #[case("2023Q4", 2023, 4)]
    #[case(" 2024-q2 ", 2024, 2)]
    fn parses_quarters(#[case] raw: &str, #[case] year: i32, #[case] quarter: u8) {
        assert_eq!(raw.parse::<Quarter>().unwrap(), Quarter { year, quarter });
    }

    #[rstest]
    #[case("2023-Q5")]
    #[case("2023-Q0")]
    #[case("Q1-2023")]
    #[case("2023-03")]
    #[case("+2023-Q1")]
    #[case("-5-Q1")]
    #[case("223-Q1")]
    #[case("2147483647-Q4")]
    fn rejects_bad_quarters(#[case] raw: &str) {
        assert!(raw.parse::<Quarter>().is_err());
    }

    #[test]
    fn next_rolls_over_year() {
        let q4 = Quarter {
            year: 2023,
            quarter: 4,
        };
        assert_eq!(q4.next().unwrap().to_string(), "2024-Q1");
    }

    #[test]
    fn next_stops_at_last_representable_year() {
        let last = Quarter {
            year: i32::MAX,
            quarter: 4,
        };
        assert_eq!(last.next(), None);
    }

    #[test]
    fn far_future_year_still_forecasts() {
        let out = assess(
            &input(&["9999-Q2", "9999-Q3", "9999-Q4"], &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]),
            &QuarterlyConfig::default(),
        )
        .unwrap();
        assert_eq!(out.forecast_quarters, vec!["10000-Q1", "10000-Q2"]);
    }

    #[test]
    fn flag_uses_unrounded_score() {
        // Penalty changes +10%, -10% give std 0.1414214; weighted 0.6025 -> 0.0852064.
        let config = QuarterlyConfig {
            penalty_weight: 0.6025,
            late_weight: 0.3975,
            flag_threshold: 0.085,
            ..QuarterlyConfig::default()
        };
        let out = assess(
            &input(&["2023-Q1", "2023-Q2", "2023-Q3"], &[100.0, 110.0, 99.0], &[5.0, 5.0, 5.0]),
            &config,
        )
        .unwrap();
        assert!((out.risk_score - 0.085).abs() < 1e-12);
        assert!(out.risk_flag);

        // Default weights give 0.0848528, which rounds up past a 0.0849 threshold.
        let config = QuarterlyConfig {
            flag_threshold: 0.0849,
            ..QuarterlyConfig::default()
        };
        let out = assess(
            &input(&["2023-Q1", "2023-Q2", "2023-Q3"], &[100.0, 110.0, 99.0], &[5.0, 5.0, 5.0]),
            &config,
        )
        .unwrap();
        assert!((out.risk_score - 0.085).abs() < 1e-12);
        assert!(!out.risk_flag);
    }

    #[test]
    fn stable_series_is_not_flagged() {
        let out = assess(
            &input(
                &["2023-Q1", "2023-Q2", "2023-Q3", "2023-Q4"],
                &[1000.0, 1010.0, 1020.0, 1030.0],
                &[10.0, 10.2, 10.1, 10.3],
            ),
            &QuarterlyConfig::default(),
        )
        .unwrap();
        assert_eq!(out.forecast_quarters, vec!["2024-Q1", "2024-Q2"]);
        assert_eq!(out.penalty_forecast_next_2_quarters.len(), 2);
        assert_eq!(out.late_pct_forecast_next_2_quarters.len(), 2);
        assert!(out.risk_score < 0.25);
        assert!(!out.risk_flag);
    }

    #[test]
    fn volatile_series_is_flagged() {
        let out = assess(
            &input(
                &["2022-Q3", "2022-Q4", "2023-Q1", "2023-Q2"],
                &[100.0, 300.0, 90.0, 400.0],
                &[5.0, 15.0, 4.0, 20.0],
            ),
            &QuarterlyConfig::default(),
        )
        .unwrap();
        assert!(out.risk_score > 0.25);
        assert!(out.risk_flag);
    }

    #[test]
    fn risk_score_weights_volatilities() {
        // Penalty changes: +10%, -10% -> std 0.141421; late series flat -> 0.
        let out = assess(
            &input(&["2023-Q1", "2023-Q2", "2023-Q3"], &[100.0, 110.0, 99.0], &[5.0, 5.0, 5.0]),
            &QuarterlyConfig::default(),
        )
        .unwrap();
        assert!((out.risk_score - 0.085).abs() < 1e-9);
    }

    #[test]
    fn forecast_steps_follow_config() {
        let config = QuarterlyConfig {
            forecast_steps: 4,
            ..QuarterlyConfig::default()
        };
        let out = assess(
            &input(&["2023-Q1", "2023-Q2", "2023-Q3"], &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]),
            &config,
        )
        .unwrap();
        assert_eq!(out.penalty_forecast_next_2_quarters.len(), 4);
        assert_eq!(out.forecast_quarters.last().unwrap(), "2024-Q3");
    }

    #[rstest]
    #[case::mismatched_lengths(input(&["2023-Q1", "2023-Q2", "2023-Q3"], &[1.0, 2.0], &[1.0, 2.0, 3.0]))]
    #[case::too_few(input(&["2023-Q1", "2023-Q2"], &[1.0, 2.0], &[1.0, 2.0]))]
    #[case::gap(input(&["2023-Q1", "2023-Q2", "2023-Q4"], &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]))]
    #[case::unordered(input(&["2023-Q2", "2023-Q1", "2023-Q3"], &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]))]
    #[case::zero_value(input(&["2023-Q1", "2023-Q2", "2023-Q3"], &[0.0, 2.0, 3.0], &[1.0, 2.0, 3.0]))]
    #[case::non_finite(input(&["2023-Q1", "2023-Q2", "2023-Q3"], &[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]))]
    fn invalid_inputs_are_rejected(#[case] bad: QuarterlyRiskInput) {
        let err = assess(&bad, &QuarterlyConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn input_deserializes_from_json() {
        let json = r#"{
            "quarters": ["2023-Q1", "2023-Q2", "2023-Q3"],
            "penalty_per_year": [1.0, 2.0, 3.0],
            "percent_returns_late": [4.0, 5.0, 6.0]
        }"#;
        let parsed: QuarterlyRiskInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.quarters.len(), 3);
    }
}
