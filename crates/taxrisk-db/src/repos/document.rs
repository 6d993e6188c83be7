//! Document repository: stored document text and FTS5 search.

use chrono::{DateTime, Utc};
use taxrisk_core::entities::Document;
use taxrisk_core::enums::DocumentFormat;
use taxrisk_core::responses::DocumentSearchHit;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, fts_query, get_opt_string, get_u64, parse_datetime, parse_enum};
use crate::service::TaxService;

/// A document about to be stored alongside its analysis.
#[derive(Debug, Clone)]
pub struct NewDocument<'a> {
    pub name: &'a str,
    pub format: DocumentFormat,
    /// Full extracted text, indexed for search.
    pub content: &'a str,
    /// Character and word counts of the source text when `content` is only
    /// a preview of it. `None` measures `content`.
    pub original_counts: Option<(u64, u64)>,
}

const DOCUMENT_COLUMNS: &str = "d.id, d.name, d.format, d.text_length, d.word_count, d.created_at";

pub(crate) fn row_to_document(row: &libsql::Row) -> Result<Document, DatabaseError> {
    Ok(Document {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        format: parse_enum(&row.get::<String>(2)?)?,
        text_length: get_u64(row, 3)?,
        word_count: get_u64(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl TaxService {
    /// Insert a document inside an open transaction.
    pub(crate) async fn insert_document_in(
        tx: &libsql::Transaction,
        id: &str,
        doc: &NewDocument<'_>,
        created_at: &DateTime<Utc>,
    ) -> Result<Document, DatabaseError> {
        let (text_length, word_count) = doc.original_counts.unwrap_or_else(|| {
            (
                doc.content.chars().count() as u64,
                doc.content.split_whitespace().count() as u64,
            )
        });
        tx.execute(
            "INSERT INTO documents (id, name, format, content, text_length, word_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            libsql::params![
                id,
                doc.name,
                doc.format.as_str(),
                doc.content,
                i64::try_from(text_length).unwrap_or(i64::MAX),
                i64::try_from(word_count).unwrap_or(i64::MAX),
                format_datetime(created_at)
            ],
        )
        .await?;

        Ok(Document {
            id: id.to_string(),
            name: doc.name.to_string(),
            format: doc.format,
            text_length,
            word_count,
            created_at: *created_at,
        })
    }

    /// Fetch document metadata by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no document has this ID.
    pub async fn get_document(&self, id: &str) -> Result<Document, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents d WHERE d.id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity: "document",
            id: id.to_string(),
        })?;
        row_to_document(&row)
    }

    /// Full stored text of a document.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no document has this ID.
    pub async fn get_document_content(&self, id: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .db()
            .query("SELECT content FROM documents WHERE id = ?1", [id])
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity: "document",
            id: id.to_string(),
        })?;
        Ok(row.get::<String>(0)?)
    }

    /// Full-text search over document names and content, best match first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for a blank query and
    /// `DatabaseError` if the query fails.
    pub async fn search_documents(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<DocumentSearchHit>, DatabaseError> {
        let fts = fts_query(query);
        if fts.is_empty() {
            return Err(DatabaseError::Validation("search query is empty".into()));
        }

        let mut rows = self
            .db()
            .query(
                &format!(
                    "SELECT {DOCUMENT_COLUMNS},
                            (SELECT a.id FROM analyses a WHERE a.document_id = d.id
                             ORDER BY a.created_at DESC LIMIT 1),
                            snippet(documents_fts, 1, '[', ']', '…', 16)
                     FROM documents_fts
                     JOIN documents d ON d.rowid = documents_fts.rowid
                     WHERE documents_fts MATCH ?1
                     ORDER BY rank LIMIT ?2"
                ),
                libsql::params![fts, limit],
            )
            .await?;

        let mut hits = Vec::new();
        while let Some(row) = rows.next().await? {
            hits.push(DocumentSearchHit {
                document: row_to_document(&row)?,
                analysis_id: get_opt_string(&row, 6)?,
                snippet: get_opt_string(&row, 7)?.unwrap_or_default(),
            });
        }
        tracing::debug!(query, hits = hits.len(), "searched documents");
        Ok(hits)
    }
}
