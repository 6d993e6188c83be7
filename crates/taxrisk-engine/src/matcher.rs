//! Compiled keyword matching.
//!
//! Each keyword becomes one case-insensitive regex. Word boundaries are only
//! anchored on sides where the keyword itself starts or ends with a word
//! character, so entries like `"401(k)"` still match. Internal whitespace
//! matches any whitespace run.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use taxrisk_core::entities::{KeywordHit, KeywordProfile};

use crate::error::EngineError;
use crate::text;

#[derive(Debug)]
struct CompiledKeyword {
    keyword: String,
    pattern: Regex,
}

#[derive(Debug)]
struct CategoryKeywords {
    category: String,
    keywords: Vec<CompiledKeyword>,
}

/// All profile keywords compiled for repeated matching.
#[derive(Debug)]
pub struct KeywordMatcher {
    categories: Vec<CategoryKeywords>,
    context_window: usize,
}

impl KeywordMatcher {
    /// Compile every keyword in `profile`.
    ///
    /// Keywords are trimmed, whitespace-normalized and lowercased; duplicates
    /// within a category collapse and keywords shorter than
    /// `min_keyword_length` chars are skipped.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidPattern` if a keyword cannot be compiled.
    pub fn compile(profile: &KeywordProfile) -> Result<Self, EngineError> {
        let settings = profile.analysis_settings;
        let mut categories = Vec::with_capacity(profile.risk_keywords.len());

        for (category, raw_keywords) in &profile.risk_keywords {
            let unique: BTreeSet<String> = raw_keywords
                .iter()
                .map(|k| text::normalize(k).to_lowercase())
                .filter(|k| k.chars().count() >= settings.min_keyword_length)
                .collect();

            let keywords = unique
                .into_iter()
                .map(|keyword| {
                    let pattern = keyword_pattern(&keyword)?;
                    Ok(CompiledKeyword { keyword, pattern })
                })
                .collect::<Result<Vec<_>, EngineError>>()?;

            tracing::trace!(category = %category, keywords = keywords.len(), "compiled category");
            categories.push(CategoryKeywords {
                category: category.clone(),
                keywords,
            });
        }

        Ok(Self {
            categories,
            context_window: settings.context_window,
        })
    }

    /// Number of compiled keywords across all categories.
    #[must_use]
    pub fn keyword_count(&self) -> usize {
        self.categories.iter().map(|c| c.keywords.len()).sum()
    }

    /// Find every keyword present in `text`, ordered by category then keyword.
    #[must_use]
    pub fn find(&self, text: &str) -> Vec<KeywordHit> {
        let mut hits = Vec::new();
        for category in &self.categories {
            for compiled in &category.keywords {
                let mut matches = compiled.pattern.find_iter(text);
                let Some(first) = matches.next() else {
                    continue;
                };
                let occurrences = 1 + u32::try_from(matches.count()).unwrap_or(u32::MAX - 1);
                hits.push(KeywordHit {
                    keyword: compiled.keyword.clone(),
                    category: category.category.clone(),
                    occurrences,
                    context: text::context(text, first.start(), first.end(), self.context_window),
                });
            }
        }
        hits
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn keyword_pattern(keyword: &str) -> Result<Regex, EngineError> {
    let body = keyword
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let lead = if keyword.starts_with(is_word_char) { r"\b" } else { "" };
    let trail = if keyword.ends_with(is_word_char) { r"\b" } else { "" };

    RegexBuilder::new(&format!("{lead}{body}{trail}"))
        .case_insensitive(true)
        .build()
        .map_err(EngineError::from)
}
