//! Engine error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from document extraction, scoring, and the quarterly model.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The document contained no analyzable text.
    #[error("Document '{0}' contains no text")]
    EmptyDocument(String),

    /// The file extension is not a supported text format.
    #[error("Unsupported document format '{0}' (supported: txt, md, csv, html, json)")]
    UnsupportedFormat(String),

    /// The file exceeds the configured size limit.
    #[error("Document is {size} bytes, larger than the {max} byte limit")]
    DocumentTooLarge { size: u64, max: u64 },

    /// Reading the document failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The keyword profile is structurally invalid.
    #[error("Invalid keyword profile: {0}")]
    InvalidProfile(String),

    /// A keyword could not be compiled into a pattern.
    #[error("Invalid keyword pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Caller-supplied values failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Trend analysis needs more stored analyses.
    #[error("Need at least {required} analyses to show historical trends, found {available}")]
    InsufficientHistory { required: usize, available: usize },
}
