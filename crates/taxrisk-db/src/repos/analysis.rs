//! Analysis repository: persisted results, category rows, and lifecycle audit.

use chrono::Utc;
use taxrisk_core::audit_detail::{
    AnalysisRecordedDetail, ClearedDetail, ConfigAppliedDetail, ExportedDetail,
};
use taxrisk_core::entities::{AnalysisRecord, AnalysisResult};
use taxrisk_core::enums::{AnalysisSource, AuditAction, DocumentFormat, EntityType};
use taxrisk_core::export::ExportEnvelope;
use taxrisk_core::ids::{PREFIX_ANALYSIS, PREFIX_DOCUMENT};
use taxrisk_core::responses::ClearResponse;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime, parse_enum, to_json};
use crate::repos::document::NewDocument;
use crate::service::TaxService;

const ANALYSIS_COLUMNS: &str = "id, document_id, source, result_json, created_at";

fn row_to_analysis(row: &libsql::Row) -> Result<AnalysisRecord, DatabaseError> {
    let id = row.get::<String>(0)?;
    let result: AnalysisResult = serde_json::from_str(&row.get::<String>(3)?)
        .map_err(|e| DatabaseError::Query(format!("Corrupt result JSON for analysis {id}: {e}")))?;
    Ok(AnalysisRecord {
        id,
        document_id: row.get::<String>(1)?,
        source: parse_enum(&row.get::<String>(2)?)?,
        result,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl TaxService {
    /// Persist a document and its analysis.
    ///
    /// Writes the document (FTS-indexed), the analysis row, one row per
    /// matched category, and a `created` (or `imported`) audit entry in a
    /// single transaction.
    ///
    /// Imported analyses keep their original `analyzed_at` as `created_at`
    /// so history trends place them where they were assessed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert fails; nothing is written then.
    pub async fn record_analysis(
        &self,
        doc: &NewDocument<'_>,
        result: &AnalysisResult,
        source: AnalysisSource,
    ) -> Result<AnalysisRecord, DatabaseError> {
        let created_at = if source == AnalysisSource::Import {
            result.analyzed_at
        } else {
            Utc::now()
        };
        let document_id = self.db().generate_id(PREFIX_DOCUMENT).await?;
        let analysis_id = self.db().generate_id(PREFIX_ANALYSIS).await?;
        let result_json = serde_json::to_string(result).map_err(|e| DatabaseError::Other(e.into()))?;

        let action = if source == AnalysisSource::Import {
            AuditAction::Imported
        } else {
            AuditAction::Created
        };
        let audit = self
            .new_audit_entry(
                EntityType::Analysis,
                &analysis_id,
                action,
                Some(to_json(&AnalysisRecordedDetail {
                    document_id: document_id.clone(),
                    document_name: result.document_name.clone(),
                    overall_risk_score: result.overall_risk_score,
                    risk_level: result.risk_level.as_str().to_string(),
                })?),
            )
            .await?;

        let tx = self.db().conn().transaction().await?;
        Self::insert_document_in(&tx, &document_id, doc, &created_at).await?;
        tx.execute(
            "INSERT INTO analyses (id, document_id, source, overall_risk_score, risk_level,
                                   analysis_status, current_escrow, result_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            libsql::params![
                analysis_id.as_str(),
                document_id.as_str(),
                source.as_str(),
                result.overall_risk_score,
                result.risk_level.as_str(),
                result.analysis_status.as_str(),
                result.escrow_adequacy.current,
                result_json,
                format_datetime(&created_at)
            ],
        )
        .await?;
        for category in result.risk_categories.values() {
            tx.execute(
                "INSERT INTO analysis_categories (analysis_id, category, score, risk_level, confidence, keyword_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    analysis_id.as_str(),
                    category.category.as_str(),
                    category.score,
                    category.risk_level.as_str(),
                    category.confidence,
                    i64::try_from(category.keywords.len()).unwrap_or(i64::MAX)
                ],
            )
            .await?;
        }
        Self::append_audit_in(&tx, &audit).await?;
        tx.commit().await?;

        tracing::info!(
            analysis = %analysis_id,
            document = %result.document_name,
            score = result.overall_risk_score,
            "recorded analysis"
        );

        Ok(AnalysisRecord {
            id: analysis_id,
            document_id,
            source,
            result: result.clone(),
            created_at,
        })
    }

    /// Fetch one analysis by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no analysis has this ID.
    pub async fn get_analysis(&self, id: &str) -> Result<AnalysisRecord, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {ANALYSIS_COLUMNS} FROM analyses WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity: "analysis",
            id: id.to_string(),
        })?;
        row_to_analysis(&row)
    }

    /// Most recent analyses first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_analyses(&self, limit: u32) -> Result<Vec<AnalysisRecord>, DatabaseError> {
        self.collect_analyses(
            &format!(
                "SELECT {ANALYSIS_COLUMNS} FROM analyses
                 ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
            ),
        )
        .await
    }

    /// Every analysis, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn analyses_chronological(&self) -> Result<Vec<AnalysisRecord>, DatabaseError> {
        self.collect_analyses(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM analyses ORDER BY created_at ASC, rowid ASC"
        ))
        .await
    }

    async fn collect_analyses(&self, sql: &str) -> Result<Vec<AnalysisRecord>, DatabaseError> {
        let mut rows = self.db().query(sql, ()).await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_analysis(&row)?);
        }
        Ok(records)
    }

    /// Delete an analysis together with its document and category rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no analysis has this ID.
    pub async fn delete_analysis(&self, id: &str) -> Result<(), DatabaseError> {
        let record = self.get_analysis(id).await?;
        let audit = self
            .new_audit_entry(
                EntityType::Analysis,
                id,
                AuditAction::Deleted,
                Some(to_json(&AnalysisRecordedDetail {
                    document_id: record.document_id.clone(),
                    document_name: record.result.document_name.clone(),
                    overall_risk_score: record.result.overall_risk_score,
                    risk_level: record.result.risk_level.as_str().to_string(),
                })?),
            )
            .await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM analysis_categories WHERE analysis_id = ?1", [id])
            .await?;
        tx.execute("DELETE FROM analyses WHERE id = ?1", [id]).await?;
        tx.execute(
            "DELETE FROM documents WHERE id = ?1
             AND NOT EXISTS (SELECT 1 FROM analyses WHERE document_id = ?1)",
            [record.document_id.as_str()],
        )
        .await?;
        Self::append_audit_in(&tx, &audit).await?;
        tx.commit().await?;

        tracing::info!(analysis = %id, "deleted analysis");
        Ok(())
    }

    /// Remove every analysis and document. The audit trail is kept.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any delete fails.
    pub async fn clear_all(&self) -> Result<ClearResponse, DatabaseError> {
        let analyses = self.db().count("SELECT COUNT(*) FROM analyses", ()).await?;
        let documents = self.db().count("SELECT COUNT(*) FROM documents", ()).await?;
        let audit = self
            .new_audit_entry(
                EntityType::Analysis,
                "*",
                AuditAction::Cleared,
                Some(to_json(&ClearedDetail {
                    analyses,
                    documents,
                })?),
            )
            .await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM analysis_categories", ()).await?;
        tx.execute("DELETE FROM analyses", ()).await?;
        tx.execute("DELETE FROM documents", ()).await?;
        Self::append_audit_in(&tx, &audit).await?;
        tx.commit().await?;

        tracing::info!(analyses, documents, "cleared analysis history");
        Ok(ClearResponse {
            analyses_removed: analyses,
            documents_removed: documents,
        })
    }

    /// Build the export envelope for an analysis. Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no analysis has this ID.
    pub async fn export_envelope(
        &self,
        id: &str,
        app_version: &str,
    ) -> Result<ExportEnvelope, DatabaseError> {
        let record = self.get_analysis(id).await?;
        Ok(ExportEnvelope::new(record.result, app_version))
    }

    /// Audit a finished export. Call only after the destination was written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the audit insert fails.
    pub async fn audit_export(
        &self,
        id: &str,
        destination: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let audit = self
            .new_audit_entry(
                EntityType::Analysis,
                id,
                AuditAction::Exported,
                Some(to_json(&ExportedDetail {
                    destination: destination.map(String::from),
                })?),
            )
            .await?;
        self.append_audit(&audit).await
    }

    /// Audit that a keyword profile was applied to the project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the audit insert fails.
    pub async fn record_config_applied(
        &self,
        path: &str,
        categories: Vec<String>,
    ) -> Result<(), DatabaseError> {
        let audit = self
            .new_audit_entry(
                EntityType::Config,
                "keyword_profile",
                AuditAction::ConfigApplied,
                Some(to_json(&ConfigAppliedDetail {
                    path: path.to_string(),
                    categories,
                })?),
            )
            .await?;
        self.append_audit(&audit).await
    }

    /// Validate and store an exported analysis.
    ///
    /// The envelope is checked against the `export_envelope` JSON Schema and
    /// its analysis type before anything is written. Only the text preview
    /// travels in an export, so that preview becomes the stored document
    /// while its lengths are taken from the original analysis.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for envelopes that fail schema
    /// validation or carry a foreign analysis type.
    pub async fn import_envelope(
        &self,
        value: &serde_json::Value,
    ) -> Result<AnalysisRecord, DatabaseError> {
        self.schema()
            .validate("export_envelope", value)
            .map_err(|e| DatabaseError::Validation(e.to_string()))?;
        let envelope: ExportEnvelope = serde_json::from_value(value.clone())
            .map_err(|e| DatabaseError::Validation(format!("Malformed export: {e}")))?;
        envelope
            .ensure_supported()
            .map_err(|e| DatabaseError::Validation(e.to_string()))?;

        let result = envelope.analysis_results;
        let doc = NewDocument {
            name: &result.document_name,
            format: DocumentFormat::PlainText,
            content: &result.document_text,
            original_counts: Some((result.text_length, result.word_count)),
        };
        self.record_analysis(&doc, &result, AnalysisSource::Import)
            .await
    }
}
