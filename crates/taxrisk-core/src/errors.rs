//! Cross-cutting error types for taxrisk.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `EngineError`) are defined in
//! their respective crates. They converge into `anyhow` at the CLI boundary.

use thiserror::Error;

/// Errors that can be raised by any taxrisk crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
