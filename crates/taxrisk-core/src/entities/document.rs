use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DocumentFormat;

/// An uploaded document whose text has been extracted.
///
/// The full text is stored alongside the row for search; it is not part of
/// this struct to keep listings small.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub format: DocumentFormat,
    pub text_length: u64,
    pub word_count: u64,
    pub created_at: DateTime<Utc>,
}
