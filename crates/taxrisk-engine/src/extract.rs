//! Plain-text extraction from uploaded documents.
//!
//! Only text formats are read. HTML is reduced to its visible text and JSON
//! to its string values; everything else passes through unchanged.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use taxrisk_core::enums::DocumentFormat;

use crate::error::EngineError;

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("script/style pattern is valid")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

const HTML_ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// A document read from disk, ready for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub name: String,
    pub format: DocumentFormat,
    pub text: String,
}

/// Resolve the document format from the path's extension.
///
/// # Errors
///
/// Returns `EngineError::UnsupportedFormat` for unknown or binary formats.
pub fn format_for_path(path: &Path) -> Result<DocumentFormat, EngineError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    DocumentFormat::from_extension(ext).ok_or_else(|| {
        EngineError::UnsupportedFormat(if ext.is_empty() {
            "(none)".to_string()
        } else {
            ext.to_string()
        })
    })
}

/// Read and extract the text of the file at `path`.
///
/// # Errors
///
/// Returns `UnsupportedFormat`, `DocumentTooLarge`, `Io`, or `EmptyDocument`.
pub fn extract_file(path: &Path, max_bytes: u64) -> Result<ExtractedDocument, EngineError> {
    let format = format_for_path(path)?;
    let io_err = |source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > max_bytes {
        return Err(EngineError::DocumentTooLarge {
            size,
            max: max_bytes,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    let raw = String::from_utf8_lossy(&bytes);
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    let text = extract_text(&name, format, &raw)?;
    tracing::debug!(name = %name, format = %format, bytes = size, "extracted document");
    Ok(ExtractedDocument { name, format, text })
}

/// Extract analyzable text from raw document content.
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` for malformed JSON and
/// `EngineError::EmptyDocument` when nothing but whitespace remains.
pub fn extract_text(name: &str, format: DocumentFormat, raw: &str) -> Result<String, EngineError> {
    let text = match format {
        DocumentFormat::Html => strip_html(raw),
        DocumentFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
                EngineError::InvalidInput(format!("'{name}' is not valid JSON: {e}"))
            })?;
            let mut leaves = Vec::new();
            collect_strings(&value, &mut leaves);
            leaves.join("\n")
        }
        DocumentFormat::PlainText | DocumentFormat::Markdown | DocumentFormat::Csv => {
            raw.to_string()
        }
    };

    if text.trim().is_empty() {
        return Err(EngineError::EmptyDocument(name.to_string()));
    }
    Ok(text)
}

fn strip_html(raw: &str) -> String {
    let without_scripts = SCRIPT_STYLE_RE.replace_all(raw, " ");
    let mut text = TAG_RE.replace_all(&without_scripts, " ").into_owned();
    // `&amp;` last so "&amp;lt;" decodes to "&lt;" rather than "<".
    for (entity, replacement) in HTML_ENTITIES {
        text = text.replace(entity, replacement);
    }
    text
}

fn collect_strings<'a>(value: &'a serde_json::Value, out: &mut Vec<&'a str>) {
    match value {
        serde_json::Value::String(s) => out.push(s),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for v in map.values() {
                collect_strings(v, out);
            }
        }
        _ => {}
    }
}
