//! HTTP contract tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use taxrisk_config::QuarterlyConfig;
use taxrisk_db::TaxService;
use taxrisk_engine::RiskEngine;
use taxrisk_server::{AppState, build_router};
use tower::ServiceExt;

async fn test_app() -> axum::Router {
    let service = TaxService::new_local(":memory:").await.unwrap();
    let engine = RiskEngine::with_defaults(500).unwrap();
    let state = AppState::new(service, engine, QuarterlyConfig::default(), 20);
    build_router(Arc::new(state))
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(
        |_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn analyze(app: &axum::Router, name: &str, text: &str) -> serde_json::Value {
    let resp = app
        .clone()
        .oneshot(post_json(
            "/analyze",
            &serde_json::json!({ "document_name": name, "text": text }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

#[tokio::test]
async fn health_reports_ok() {
    let resp = test_app().await.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");
}

#[tokio::test]
async fn quarterly_risk_forecasts_two_quarters() {
    let body = serde_json::json!({
        "quarters": ["2023-Q1", "2023-Q2", "2023-Q3", "2023-Q4"],
        "penalty_per_year": [1000.0, 1500.0, 900.0, 2000.0],
        "percent_returns_late": [5.0, 7.5, 4.0, 9.0]
    });
    let resp = test_app()
        .await
        .oneshot(post_json("/quarterly-risk", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["penalty_forecast_next_2_quarters"].as_array().unwrap().len(), 2);
    assert_eq!(json["late_pct_forecast_next_2_quarters"].as_array().unwrap().len(), 2);
    assert_eq!(json["risk_flag"], true);
    assert!(json["risk_score"].as_f64().unwrap() > 0.25);
}

#[tokio::test]
async fn quarterly_risk_rejects_short_series() {
    let body = serde_json::json!({
        "quarters": ["2023-Q1", "2023-Q2"],
        "penalty_per_year": [1.0, 2.0],
        "percent_returns_late": [1.0, 2.0]
    });
    let resp = test_app()
        .await
        .oneshot(post_json("/quarterly-risk", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].as_str().unwrap().contains("3 quarters"));
}

#[tokio::test]
async fn quarterly_risk_missing_fields_is_json_400() {
    let body = serde_json::json!({ "quarters": ["2023-Q1"] });
    let resp = test_app()
        .await
        .oneshot(post_json("/quarterly-risk", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert!(json["error"].as_str().unwrap().contains("penalty_per_year"));
}

#[tokio::test]
async fn quarterly_risk_rejects_out_of_range_year() {
    let body = serde_json::json!({
        "quarters": ["2147483647-Q2", "2147483647-Q3", "2147483647-Q4"],
        "penalty_per_year": [1.0, 2.0, 3.0],
        "percent_returns_late": [1.0, 2.0, 3.0]
    });
    let resp = test_app()
        .await
        .oneshot(post_json("/quarterly-risk", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn analyze_with_wrong_field_type_is_json_400() {
    let body = serde_json::json!({ "document_name": "memo.txt", "text": 42 });
    let resp = test_app()
        .await
        .oneshot(post_json("/analyze", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn malformed_list_limit_is_json_400() {
    let resp = test_app()
        .await
        .oneshot(get("/analyses?limit=many"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn analyze_then_fetch() {
    let app = test_app().await;
    let record = analyze(
        &app,
        "memo.txt",
        "Transfer pricing and intercompany royalty terms. Nexus exists.",
    )
    .await;
    assert_eq!(record["source"], "api");
    assert_eq!(record["result"]["risk_level"], "medium");
    assert_eq!(record["result"]["overall_risk_score"], 38.5);
    assert!(record["result"]["audit_probability"]["12_month"].is_number());

    let id = record["id"].as_str().unwrap();
    let resp = app.clone().oneshot(get(&format!("/analyses/{id}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["id"], id);

    let resp = app.oneshot(get("/analyses?limit=5")).await.unwrap();
    assert_eq!(body_json(resp).await["analyses"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn analyze_reads_html_when_asked() {
    let app = test_app().await;
    let resp = app
        .oneshot(post_json(
            "/analyze",
            &serde_json::json!({
                "document_name": "filing.html",
                "text": "<p>Permanent&nbsp;establishment</p>",
                "format": "html"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(
        json["result"]["found_keywords"][0]["keyword"],
        "permanent establishment"
    );
}

#[tokio::test]
async fn analyze_rejects_blank_text() {
    let resp = test_app()
        .await
        .oneshot(post_json(
            "/analyze",
            &serde_json::json!({ "document_name": "blank.txt", "text": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_analysis_is_404() {
    let resp = test_app()
        .await
        .oneshot(get("/analyses/ana-deadbeef"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_json(resp).await["error"].as_str().unwrap().contains("ana-deadbeef"));
}

#[tokio::test]
async fn history_needs_two_analyses() {
    let app = test_app().await;
    analyze(&app, "a.txt", "Nexus exists.").await;

    let resp = app.clone().oneshot(get("/history")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    analyze(&app, "b.txt", "Nexus and apportionment.").await;
    let resp = app.oneshot(get("/history")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["trend"].as_array().unwrap().len(), 2);
    assert_eq!(json["direction"], "increasing");
}

#[tokio::test]
async fn dashboard_summarizes_stored_analyses() {
    let app = test_app().await;
    let resp = app.clone().oneshot(get("/dashboard")).await.unwrap();
    assert_eq!(body_json(resp).await["total_analyses"], 0);

    analyze(&app, "a.txt", "Nexus exists.").await;
    let resp = app.oneshot(get("/dashboard")).await.unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["total_analyses"], 1);
    assert_eq!(json["by_risk_level"]["low"], 1);
    assert_eq!(json["category_totals"]["state_tax"]["analyses"], 1);
}
