//! POST /quarterly-risk: penalty and late-filing forecast with a volatility flag.

use std::sync::Arc;

use axum::{Extension, Json};
use taxrisk_engine::quarterly::{self, QuarterlyRiskInput, QuarterlyRiskOutput};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub async fn quarterly_risk(
    Extension(state): Extension<Arc<AppState>>,
    AppJson(input): AppJson<QuarterlyRiskInput>,
) -> Result<Json<QuarterlyRiskOutput>, AppError> {
    let output = quarterly::assess(&input, &state.quarterly)?;
    Ok(Json(output))
}
