//! ARIMA(1,1,1) without constant, fitted by conditional sum of squares.
//!
//! The series is differenced once; the ARMA(1,1) on the differences is
//! fitted by grid search over `phi` and `theta` with the pre-sample residual
//! fixed at zero.

/// Grid runs from -0.95 to 0.95 in steps of 0.05.
const GRID_STEPS: i32 = 19;
const GRID_STEP: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Arima111 {
    pub phi: f64,
    pub theta: f64,
    pub sse: f64,
    last_level: f64,
    last_diff: f64,
    last_residual: f64,
}

impl Arima111 {
    /// Fit the model to `series`. Returns `None` for fewer than three points.
    pub fn fit(series: &[f64]) -> Option<Self> {
        if series.len() < 3 {
            return None;
        }
        let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

        let mut best: Option<(f64, f64, f64, f64)> = None;
        for i in -GRID_STEPS..=GRID_STEPS {
            let phi = f64::from(i) * GRID_STEP;
            for j in -GRID_STEPS..=GRID_STEPS {
                let theta = f64::from(j) * GRID_STEP;
                let (sse, last_residual) = css(&diffs, phi, theta);
                if best.is_none_or(|(_, _, best_sse, _)| sse < best_sse) {
                    best = Some((phi, theta, sse, last_residual));
                }
            }
        }

        let (phi, theta, sse, last_residual) = best?;
        Some(Self {
            phi,
            theta,
            sse,
            last_level: *series.last()?,
            last_diff: *diffs.last()?,
            last_residual,
        })
    }

    /// Point forecasts for the next `steps` periods, in levels.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(steps);
        let mut level = self.last_level;
        let mut diff = self.last_diff;
        for step in 0..steps {
            diff = if step == 0 {
                self.phi.mul_add(diff, self.theta * self.last_residual)
            } else {
                self.phi * diff
            };
            level += diff;
            out.push(level);
        }
        out
    }
}

/// Sum of squared one-step residuals and the final residual.
fn css(diffs: &[f64], phi: f64, theta: f64) -> (f64, f64) {
    let mut sse = 0.0;
    let mut prev_residual = 0.0;
    for t in 1..diffs.len() {
        let predicted = phi.mul_add(diffs[t - 1], theta * prev_residual);
        let residual = diffs[t] - predicted;
        sse = residual.mul_add(residual, sse);
        prev_residual = residual;
    }
    (sse, prev_residual)
}
