//! `TaxService` persistence, audit, search, and bulk export/import.

use pretty_assertions::assert_eq;
use taxrisk_core::entities::AnalysisResult;
use taxrisk_core::enums::{AnalysisSource, AuditAction, DocumentFormat, EntityType, RiskLevel};
use taxrisk_core::export::ExportEnvelope;
use taxrisk_db::{AuditFilter, DatabaseError, NewDocument, TaxService};
use taxrisk_engine::RiskEngine;

const TP_MEMO: &str = "Transfer pricing and intercompany royalty terms. Nexus exists.";
const STATE_MEMO: &str = "Nexus study pending; apportionment under review.";

async fn service() -> TaxService {
    TaxService::new_local(":memory:").await.unwrap()
}

fn analyze(name: &str, text: &str) -> AnalysisResult {
    RiskEngine::with_defaults(500)
        .unwrap()
        .analyze(name, text, 0.0)
        .unwrap()
}

async fn record(svc: &TaxService, name: &str, text: &str) -> String {
    let result = analyze(name, text);
    let doc = NewDocument {
        name,
        format: DocumentFormat::PlainText,
        content: text,
        original_counts: None,
    };
    svc.record_analysis(&doc, &result, AnalysisSource::Upload)
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn record_and_get_roundtrip() {
    let svc = service().await;
    let result = analyze("tp.txt", TP_MEMO);
    let doc = NewDocument {
        name: "tp.txt",
        format: DocumentFormat::PlainText,
        content: TP_MEMO,
        original_counts: None,
    };
    let record = svc
        .record_analysis(&doc, &result, AnalysisSource::Upload)
        .await
        .unwrap();

    let fetched = svc.get_analysis(&record.id).await.unwrap();
    assert_eq!(fetched.result, result);
    assert_eq!(fetched.document_id, record.document_id);
    assert_eq!(fetched.source, AnalysisSource::Upload);

    let document = svc.get_document(&record.document_id).await.unwrap();
    assert_eq!(document.name, "tp.txt");
    assert_eq!(document.word_count, 8);
    assert_eq!(
        svc.get_document_content(&record.document_id).await.unwrap(),
        TP_MEMO
    );

    let categories = svc
        .db()
        .count(
            "SELECT COUNT(*) FROM analysis_categories WHERE analysis_id = ?1",
            [record.id.as_str()],
        )
        .await
        .unwrap();
    assert_eq!(categories, 2);

    let level = svc
        .db()
        .count(
            "SELECT COUNT(*) FROM analyses WHERE id = ?1 AND risk_level = ?2",
            [record.id.as_str(), RiskLevel::Medium.as_str()],
        )
        .await
        .unwrap();
    assert_eq!(level, 1);
}

#[tokio::test]
async fn missing_analysis_is_not_found() {
    let svc = service().await;
    let err = svc.get_analysis("ana-deadbeef").await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound { entity: "analysis", .. }));
}

#[tokio::test]
async fn list_is_newest_first_and_chronological_is_oldest_first() {
    let svc = service().await;
    let first = record(&svc, "a.txt", TP_MEMO).await;
    let second = record(&svc, "b.txt", STATE_MEMO).await;
    let third = record(&svc, "c.txt", TP_MEMO).await;

    let listed: Vec<String> = svc
        .list_analyses(2)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(listed, vec![third.clone(), second.clone()]);

    let chrono: Vec<String> = svc
        .analyses_chronological()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(chrono, vec![first, second, third]);
}

#[tokio::test]
async fn delete_removes_document_and_audits() {
    let svc = service().await;
    let id = record(&svc, "tp.txt", TP_MEMO).await;
    let document_id = svc.get_analysis(&id).await.unwrap().document_id;

    svc.delete_analysis(&id).await.unwrap();

    assert!(matches!(
        svc.get_analysis(&id).await,
        Err(DatabaseError::NotFound { .. })
    ));
    assert!(matches!(
        svc.get_document(&document_id).await,
        Err(DatabaseError::NotFound { .. })
    ));
    let entries = svc
        .query_audit(&AuditFilter {
            entity_id: Some(id.clone()),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    let actions: Vec<AuditAction> = entries.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::Deleted, AuditAction::Created]);
}

#[tokio::test]
async fn clear_all_reports_counts() {
    let svc = service().await;
    record(&svc, "a.txt", TP_MEMO).await;
    record(&svc, "b.txt", STATE_MEMO).await;

    let cleared = svc.clear_all().await.unwrap();
    assert_eq!(cleared.analyses_removed, 2);
    assert_eq!(cleared.documents_removed, 2);
    assert!(svc.list_analyses(10).await.unwrap().is_empty());

    let entries = svc
        .query_audit(&AuditFilter {
            action: Some(AuditAction::Cleared),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].detail.as_ref().unwrap()["analyses"], 2);
}

#[tokio::test]
async fn search_finds_documents_by_content() {
    let svc = service().await;
    let tp = record(&svc, "tp.txt", TP_MEMO).await;
    record(&svc, "state.txt", STATE_MEMO).await;

    let hits = svc.search_documents("royalty", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document.name, "tp.txt");
    assert_eq!(hits[0].analysis_id.as_deref(), Some(tp.as_str()));
    assert!(hits[0].snippet.contains("[royalty]"));

    // Porter stemming matches "study" against "studies".
    assert_eq!(svc.search_documents("studies", 10).await.unwrap().len(), 1);
    assert!(svc.search_documents("royalty(", 10).await.is_ok());
    assert!(matches!(
        svc.search_documents("   ", 10).await,
        Err(DatabaseError::Validation(_))
    ));
}

#[tokio::test]
async fn audit_filters_by_entity_type() {
    let svc = service().await;
    record(&svc, "tp.txt", TP_MEMO).await;
    svc.record_config_applied("keywords.json", vec!["customs".into()])
        .await
        .unwrap();

    let config_entries = svc
        .query_audit(&AuditFilter {
            entity_type: Some(EntityType::Config),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(config_entries.len(), 1);
    assert_eq!(config_entries[0].action, AuditAction::ConfigApplied);

    let limited = svc
        .query_audit(&AuditFilter {
            limit: Some(1),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn export_envelope_imports_back() {
    let svc = service().await;
    let id = record(&svc, "tp.txt", TP_MEMO).await;

    let envelope = svc.export_envelope(&id, "0.1.0").await.unwrap();
    let value = serde_json::to_value(&envelope).unwrap();

    let imported = svc.import_envelope(&value).await.unwrap();
    assert_eq!(imported.source, AnalysisSource::Import);
    assert_eq!(imported.result, envelope.analysis_results);
    assert_eq!(imported.created_at, envelope.analysis_results.analyzed_at);
    assert_ne!(imported.id, id);
}

#[tokio::test]
async fn import_keeps_original_document_counts() {
    let svc = service().await;
    let mut result = analyze("long.txt", TP_MEMO);
    result.text_length = 48_000;
    result.word_count = 7_500;
    result.document_text = "Transfer pricing and intercompany…".into();
    let value = serde_json::to_value(ExportEnvelope::new(result, "0.1.0")).unwrap();

    let imported = svc.import_envelope(&value).await.unwrap();
    let document = svc.get_document(&imported.document_id).await.unwrap();
    assert_eq!(document.text_length, 48_000);
    assert_eq!(document.word_count, 7_500);
}

#[tokio::test]
async fn imported_analysis_sorts_by_original_date() {
    let svc = service().await;
    record(&svc, "fresh.txt", STATE_MEMO).await;

    let mut old = analyze("old.txt", TP_MEMO);
    old.analyzed_at -= chrono::Duration::days(400);
    let value = serde_json::to_value(ExportEnvelope::new(old, "0.1.0")).unwrap();
    svc.import_envelope(&value).await.unwrap();

    let names: Vec<String> = svc
        .analyses_chronological()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.result.document_name)
        .collect();
    assert_eq!(names, vec!["old.txt", "fresh.txt"]);
}

#[tokio::test]
async fn failed_export_leaves_no_audit() {
    let svc = service().await;
    record(&svc, "a.txt", TP_MEMO).await;
    record(&svc, "b.txt", STATE_MEMO).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("all.jsonl");
    assert!(svc.export_all(&path, "0.1.0").await.is_err());

    let exported = svc
        .query_audit(&AuditFilter {
            action: Some(AuditAction::Exported),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert!(exported.is_empty());
}

#[tokio::test]
async fn successful_export_audits_each_analysis() {
    let svc = service().await;
    record(&svc, "a.txt", TP_MEMO).await;
    record(&svc, "b.txt", STATE_MEMO).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("all.jsonl");
    svc.export_all(&path, "0.1.0").await.unwrap();

    let exported = svc
        .query_audit(&AuditFilter {
            action: Some(AuditAction::Exported),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(exported.len(), 2);
}

#[tokio::test]
async fn import_rejects_foreign_and_malformed_envelopes() {
    let svc = service().await;
    let envelope = ExportEnvelope::new(analyze("tp.txt", TP_MEMO), "0.1.0");

    let mut foreign = serde_json::to_value(&envelope).unwrap();
    foreign["metadata"]["analysis_type"] = "credit_risk".into();
    assert!(matches!(
        svc.import_envelope(&foreign).await,
        Err(DatabaseError::Validation(_))
    ));

    let malformed = serde_json::json!({"metadata": {}, "analysis_results": 3});
    assert!(matches!(
        svc.import_envelope(&malformed).await,
        Err(DatabaseError::Validation(_))
    ));
}

#[tokio::test]
async fn jsonl_export_all_and_import() {
    let source = service().await;
    record(&source, "a.txt", TP_MEMO).await;
    record(&source, "b.txt", STATE_MEMO).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("all.jsonl");
    assert_eq!(source.export_all(&path, "0.1.0").await.unwrap(), 2);

    // Append one bad line; it is skipped rather than failing the batch.
    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("{\"metadata\": 1}\n");
    std::fs::write(&path, contents).unwrap();

    let target = service().await;
    let response = target.import_jsonl(&path).await.unwrap();
    assert_eq!(response.imported.len(), 2);
    assert_eq!(response.skipped, 1);

    let names: Vec<String> = target
        .analyses_chronological()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.result.document_name)
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}
