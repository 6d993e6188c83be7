//! ID prefixes for taxrisk entities.
//!
//! IDs are formatted `{prefix}-{8 hex chars}` (e.g. `ana-a3f8b2c1`) and are
//! generated by the database layer.

pub const PREFIX_DOCUMENT: &str = "doc";
pub const PREFIX_ANALYSIS: &str = "ana";
pub const PREFIX_AUDIT: &str = "aud";

/// Every prefix in use.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_DOCUMENT, PREFIX_ANALYSIS, PREFIX_AUDIT];

/// Check whether `id` has the shape `{prefix}-{8 hex}`.
#[must_use]
pub fn is_valid_id(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
