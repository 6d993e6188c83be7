//! Text helpers shared by extraction and keyword matching.
//!
//! Every function is char-boundary safe; byte offsets passed in must come
//! from a regex match or another boundary-aligned source.

/// Collapse runs of whitespace into single spaces and trim both ends.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Count whitespace-delimited tokens.
#[must_use]
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Length in chars, not bytes.
#[must_use]
pub fn char_length(text: &str) -> u64 {
    text.chars().count() as u64
}

/// First `max_chars` chars of `text`, with `…` appended when truncated.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Surrounding text for the match at byte range `start..end`.
///
/// Takes up to `window` chars on each side and normalizes whitespace.
#[must_use]
pub fn context(text: &str, start: usize, end: usize, window: usize) -> String {
    let before = &text[..start];
    let lo = before
        .char_indices()
        .rev()
        .nth(window.saturating_sub(1))
        .map_or(0, |(i, _)| i);
    let lo = if window == 0 { start } else { lo };

    let after = &text[end..];
    let hi = after
        .char_indices()
        .nth(window)
        .map_or(text.len(), |(i, _)| end + i);

    normalize(&text[lo..hi])
}
