//! Audit trail repository.
//!
//! Append-only audit entries recording every mutation, with dynamic filtering.

use chrono::Utc;
use libsql::params::IntoParams;
use taxrisk_core::entities::AuditEntry;
use taxrisk_core::enums::{AuditAction, EntityType};
use taxrisk_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::TaxService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub limit: Option<u32>,
}

const INSERT_AUDIT: &str =
    "INSERT INTO audit_trail (id, entity_type, entity_id, action, detail, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

fn audit_params(entry: &AuditEntry) -> impl IntoParams {
    libsql::params![
        entry.id.as_str(),
        entry.entity_type.as_str(),
        entry.entity_id.as_str(),
        entry.action.as_str(),
        entry.detail.as_ref().map(std::string::ToString::to_string),
        format_datetime(&entry.created_at)
    ]
}

fn row_to_audit(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    Ok(AuditEntry {
        id: row.get::<String>(0)?,
        entity_type: parse_enum(&row.get::<String>(1)?)?,
        entity_id: row.get::<String>(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        detail: parse_optional_json(get_opt_string(row, 4)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl TaxService {
    /// Build an audit entry with a fresh ID, timestamped now.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if ID generation fails.
    pub async fn new_audit_entry(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        detail: Option<serde_json::Value>,
    ) -> Result<AuditEntry, DatabaseError> {
        Ok(AuditEntry {
            id: self.db().generate_id(PREFIX_AUDIT).await?,
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            detail,
            created_at: Utc::now(),
        })
    }

    /// Append an audit entry outside of any other mutation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn append_audit(&self, entry: &AuditEntry) -> Result<(), DatabaseError> {
        self.db().execute(INSERT_AUDIT, audit_params(entry)).await?;
        Ok(())
    }

    /// Append an audit entry as part of an open transaction.
    pub(crate) async fn append_audit_in(
        tx: &libsql::Transaction,
        entry: &AuditEntry,
    ) -> Result<(), DatabaseError> {
        tx.execute(INSERT_AUDIT, audit_params(entry)).await?;
        Ok(())
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(ref action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, entity_type, entity_id, action, detail, created_at
             FROM audit_trail {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_audit(&row)?);
        }
        Ok(entries)
    }
}
