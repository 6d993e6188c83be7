//! Document analysis and stored results.
//!
//! - POST /analyze: score a document and persist the result
//! - GET /analyses: most recent analyses
//! - GET /analyses/:id: one stored analysis

use std::sync::Arc;

use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use taxrisk_core::entities::AnalysisRecord;
use taxrisk_core::enums::{AnalysisSource, DocumentFormat};
use taxrisk_core::responses::AnalysisListResponse;
use taxrisk_db::NewDocument;
use taxrisk_engine::extract;

use crate::error::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub document_name: String,
    pub text: String,
    #[serde(default)]
    pub current_escrow: Option<f64>,
    /// How to read `text`; HTML and JSON are reduced to plain text first.
    #[serde(default)]
    pub format: Option<DocumentFormat>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
}

pub async fn analyze(
    Extension(state): Extension<Arc<AppState>>,
    AppJson(req): AppJson<AnalyzeRequest>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let format = req.format.unwrap_or(DocumentFormat::PlainText);
    let text = extract::extract_text(&req.document_name, format, &req.text)?;
    let result = state
        .engine
        .analyze(&req.document_name, &text, req.current_escrow.unwrap_or(0.0))?;

    let doc = NewDocument {
        name: &req.document_name,
        format,
        content: &text,
        original_counts: None,
    };
    let service = state.service.lock().await;
    let record = service
        .record_analysis(&doc, &result, AnalysisSource::Api)
        .await?;
    Ok(Json(record))
}

pub async fn list_analyses(
    Extension(state): Extension<Arc<AppState>>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<AnalysisListResponse>, AppError> {
    let limit = params.limit.unwrap_or(state.default_limit);
    let analyses = state.service.lock().await.list_analyses(limit).await?;
    Ok(Json(AnalysisListResponse { analyses }))
}

pub async fn get_analysis(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let record = state.service.lock().await.get_analysis(&id).await?;
    Ok(Json(record))
}
