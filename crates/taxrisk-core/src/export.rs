//! Portable JSON export envelope.
//!
//! A single analysis is exported as:
//!
//! ```json
//! {
//!   "metadata": {
//!     "timestamp": "2026-01-01T12:00:00Z",
//!     "app_version": "0.1.0",
//!     "analysis_type": "tax_risk_assessment"
//!   },
//!   "analysis_results": { "document_name": "...", "overall_risk_score": 42.5, ... }
//! }
//! ```

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::AnalysisResult;
use crate::errors::CoreError;

/// Value of `metadata.analysis_type` for every export this tool produces.
pub const ANALYSIS_TYPE: &str = "tax_risk_assessment";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportMetadata {
    pub timestamp: DateTime<Utc>,
    pub app_version: String,
    pub analysis_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExportEnvelope {
    pub metadata: ExportMetadata,
    pub analysis_results: AnalysisResult,
}

impl ExportEnvelope {
    /// Wrap a result with fresh metadata.
    #[must_use]
    pub fn new(result: AnalysisResult, app_version: &str) -> Self {
        Self {
            metadata: ExportMetadata {
                timestamp: Utc::now(),
                app_version: app_version.to_string(),
                analysis_type: ANALYSIS_TYPE.to_string(),
            },
            analysis_results: result,
        }
    }

    /// Reject envelopes produced by a different kind of analysis.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `analysis_type` is not
    /// [`ANALYSIS_TYPE`].
    pub fn ensure_supported(&self) -> Result<(), CoreError> {
        if self.metadata.analysis_type == ANALYSIS_TYPE {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "unsupported analysis_type '{}', expected '{ANALYSIS_TYPE}'",
                self.metadata.analysis_type
            )))
        }
    }
}
