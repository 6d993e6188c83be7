//! GET /dashboard and GET /history: rollups over every stored analysis.

use std::sync::Arc;

use axum::{Extension, Json};
use taxrisk_core::responses::{DashboardSummary, HistorySummary};
use taxrisk_engine::{dashboard, history};

use crate::error::AppError;
use crate::state::AppState;

pub async fn dashboard(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<DashboardSummary>, AppError> {
    let records = state.service.lock().await.analyses_chronological().await?;
    Ok(Json(dashboard::summarize(&records)))
}

pub async fn history(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<HistorySummary>, AppError> {
    let records = state.service.lock().await.analyses_chronological().await?;
    Ok(Json(history::summarize(&records)?))
}
