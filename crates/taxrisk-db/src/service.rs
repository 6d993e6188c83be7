//! Service layer orchestrating database mutations with the audit trail.
//!
//! `TaxService` wraps `TaxDb` (raw database access) and `SchemaRegistry`
//! (validation of untrusted JSON). All repo methods are implemented as
//! `impl TaxService` blocks under [`crate::repos`].

use taxrisk_schema::SchemaRegistry;

use crate::TaxDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with audit entries.
///
/// Every mutation method follows this protocol:
/// 1. Generate IDs
/// 2. Begin transaction
/// 3. Execute SQL
/// 4. Append audit entry (inside transaction)
/// 5. Commit transaction
pub struct TaxService {
    db: TaxDb,
    schema: SchemaRegistry,
}

impl TaxService {
    /// Create a new service wrapping a local database.
    ///
    /// Pass `":memory:"` as `db_path` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = TaxDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `TaxDb`.
    #[must_use]
    pub fn from_db(db: TaxDb) -> Self {
        Self {
            db,
            schema: SchemaRegistry::new(),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TaxDb {
        &self.db
    }

    /// Access the schema registry.
    #[must_use]
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }
}
