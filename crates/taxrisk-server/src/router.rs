//! Router construction for the taxrisk server.

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/quarterly-risk", post(handlers::quarterly::quarterly_risk))
        .route("/analyze", post(handlers::analysis::analyze))
        .route("/analyses", get(handlers::analysis::list_analyses))
        .route("/analyses/:id", get(handlers::analysis::get_analysis))
        .route("/dashboard", get(handlers::aggregates::dashboard))
        .route("/history", get(handlers::aggregates::history))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(state)),
        )
}
