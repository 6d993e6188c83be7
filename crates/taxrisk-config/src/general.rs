//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

/// Default number of characters kept as the document preview.
const fn default_preview_chars() -> usize {
    2000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list/search commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Characters of extracted text stored with each analysis.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            preview_chars: default_preview_chars(),
        }
    }
}
