//! # taxrisk-db
//!
//! libSQL persistence for taxrisk: uploaded documents, analysis results,
//! per-category score rows, and the append-only audit trail.
//!
//! Uses the `libsql` crate (C `SQLite` fork) for native FTS5 over document
//! text. Everything runs against a local file, or `":memory:"` in tests.

pub mod bulk;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

pub use error::DatabaseError;
pub use repos::audit::AuditFilter;
pub use repos::document::NewDocument;
pub use service::TaxService;

use libsql::Builder;
use libsql::params::IntoParams;

/// Central database handle.
///
/// Wraps a libSQL database and connection and provides ID generation.
pub struct TaxDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TaxDb {
    /// Open a local database at the given path.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let tax_db = Self { db, conn };
        tax_db.run_migrations().await?;
        tracing::debug!(path, "opened database");
        Ok(tax_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Execute a statement, returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the statement fails.
    pub async fn execute(&self, sql: &str, params: impl IntoParams) -> Result<u64, DatabaseError> {
        Ok(self.conn.execute(sql, params).await?)
    }

    /// Run a query and return its rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the query fails.
    pub async fn query(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<libsql::Rows, DatabaseError> {
        Ok(self.conn.query(sql, params).await?)
    }

    /// Run a `SELECT COUNT(*)`-style query returning one integer.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn count(&self, sql: &str, params: impl IntoParams) -> Result<u64, DatabaseError> {
        let mut rows = self.query(sql, params).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let n = row.get::<i64>(0)?;
        u64::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("negative count {n}")))
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"ana-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
