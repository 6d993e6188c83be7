//! JSONL bulk export and import.
//!
//! One `ExportEnvelope` per line, written with `serde_jsonlines`. Import reads
//! raw JSON values so each line can be schema-validated on its own; invalid
//! lines are skipped and counted rather than aborting the batch.

use std::path::Path;

use taxrisk_core::export::ExportEnvelope;
use taxrisk_core::responses::ImportResponse;

use crate::error::DatabaseError;
use crate::service::TaxService;

impl TaxService {
    /// Write every analysis, oldest first, to `path` as JSON lines.
    ///
    /// `exported` audit entries are appended only once the file is written.
    ///
    /// Returns the number of envelopes written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if reading analyses or writing the file fails.
    pub async fn export_all(&self, path: &Path, app_version: &str) -> Result<usize, DatabaseError> {
        let records = self.analyses_chronological().await?;
        let destination = path.display().to_string();

        let envelopes: Vec<ExportEnvelope> = records
            .iter()
            .map(|record| ExportEnvelope::new(record.result.clone(), app_version))
            .collect();

        serde_jsonlines::write_json_lines(path, &envelopes)
            .map_err(|e| DatabaseError::Other(e.into()))?;
        for record in &records {
            self.audit_export(&record.id, Some(destination.as_str())).await?;
        }
        tracing::info!(path = %destination, count = envelopes.len(), "exported analyses");
        Ok(envelopes.len())
    }

    /// Import every valid envelope in a JSONL file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file cannot be opened or a database
    /// write fails. Malformed lines only increment `skipped`.
    pub async fn import_jsonl(&self, path: &Path) -> Result<ImportResponse, DatabaseError> {
        let lines = serde_jsonlines::json_lines::<serde_json::Value, _>(path)
            .map_err(|e| DatabaseError::Other(e.into()))?;

        let mut imported = Vec::new();
        let mut skipped = 0u32;
        for (line_no, line) in lines.enumerate() {
            let value = match line {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(line = line_no + 1, error = %e, "skipping unreadable line");
                    skipped += 1;
                    continue;
                }
            };
            match self.import_envelope(&value).await {
                Ok(record) => imported.push(record.id),
                Err(DatabaseError::Validation(reason)) => {
                    tracing::warn!(line = line_no + 1, %reason, "skipping invalid export");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(imported = imported.len(), skipped, "imported analyses");
        Ok(ImportResponse { imported, skipped })
    }
}
