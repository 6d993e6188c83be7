//! The weighted keyword risk engine.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use taxrisk_config::EngineConfig;
use taxrisk_core::entities::{AnalysisResult, CategoryAssessment, KeywordHit, KeywordProfile};
use taxrisk_core::enums::{AnalysisStatus, RiskLevel};

use crate::error::EngineError;
use crate::matcher::KeywordMatcher;
use crate::{compliance, contingency, profile, round_to, text};

/// Points for the first occurrence of a keyword.
const FIRST_HIT_POINTS: f64 = 10.0;
/// Points for each further occurrence of the same keyword.
const REPEAT_HIT_POINTS: f64 = 2.0;
/// Share of non-maximal category scores added to the overall score.
const SECONDARY_CATEGORY_SHARE: f64 = 0.25;
const BASE_CONFIDENCE: f64 = 40.0;
const CONFIDENCE_PER_KEYWORD: f64 = 15.0;
const MAX_CONFIDENCE: f64 = 95.0;
const MAX_SCORE: f64 = 100.0;

/// Scores documents against a keyword profile.
///
/// Construction compiles every keyword once; [`RiskEngine::analyze`] is then
/// a pure function of its inputs apart from the `analyzed_at` timestamp.
#[derive(Debug)]
pub struct RiskEngine {
    profile: KeywordProfile,
    matcher: KeywordMatcher,
    config: EngineConfig,
    preview_chars: usize,
}

impl RiskEngine {
    /// Build an engine from a profile and engine settings.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidProfile` if the profile fails validation,
    /// or `EngineError::InvalidPattern` if a keyword cannot be compiled.
    pub fn new(
        profile: KeywordProfile,
        config: EngineConfig,
        preview_chars: usize,
    ) -> Result<Self, EngineError> {
        profile
            .validate()
            .map_err(|e| EngineError::InvalidProfile(e.to_string()))?;
        let matcher = KeywordMatcher::compile(&profile)?;
        tracing::debug!(
            categories = profile.risk_keywords.len(),
            keywords = matcher.keyword_count(),
            "risk engine ready"
        );
        Ok(Self {
            profile,
            matcher,
            config,
            preview_chars,
        })
    }

    /// Engine with the built-in profile and default settings.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in profile is broken.
    pub fn with_defaults(preview_chars: usize) -> Result<Self, EngineError> {
        Self::new(profile::default_profile(), EngineConfig::default(), preview_chars)
    }

    #[must_use]
    pub const fn profile(&self) -> &KeywordProfile {
        &self.profile
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze `text` as the document `name`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EmptyDocument` for blank text and
    /// `EngineError::InvalidInput` for a negative or non-finite escrow.
    pub fn analyze(
        &self,
        name: &str,
        text: &str,
        current_escrow: f64,
    ) -> Result<AnalysisResult, EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::EmptyDocument(name.to_string()));
        }
        if !current_escrow.is_finite() || current_escrow < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "current escrow must be a non-negative amount, got {current_escrow}"
            )));
        }

        let found_keywords = self.matcher.find(text);
        let risk_categories = self.score_categories(&found_keywords);
        let overall_risk_score = overall_score(&risk_categories);
        let risk_level = self.level(overall_risk_score);

        let flagged_keywords: Vec<String> = risk_categories
            .values()
            .filter(|c| c.risk_level >= RiskLevel::Medium)
            .flat_map(|c| c.keywords.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let audit_probability = contingency::audit_probability(overall_risk_score, &self.config);
        let expected_tax_contingency = contingency::expected_contingency(
            &risk_categories,
            &self.profile,
            &audit_probability,
            &self.config,
        );
        let escrow_adequacy =
            contingency::escrow_adequacy(&expected_tax_contingency, current_escrow);
        let compliance_assessment = compliance::assess(&risk_categories);

        let analysis_status = if found_keywords.is_empty() {
            AnalysisStatus::NoRiskIndicators
        } else {
            AnalysisStatus::Complete
        };

        tracing::info!(
            document = %name,
            score = overall_risk_score,
            level = %risk_level,
            hits = found_keywords.len(),
            "analyzed document"
        );

        Ok(AnalysisResult {
            document_name: name.to_string(),
            document_text: text::preview(text, self.preview_chars),
            text_length: text::char_length(text),
            word_count: text::word_count(text),
            analysis_status,
            found_keywords,
            flagged_keywords,
            risk_categories,
            overall_risk_score,
            risk_level,
            audit_probability,
            expected_tax_contingency,
            escrow_adequacy,
            compliance_assessment,
            analyzed_at: Utc::now(),
        })
    }

    fn level(&self, score: f64) -> RiskLevel {
        RiskLevel::from_score(
            score,
            self.config.medium_threshold,
            self.config.high_threshold,
            self.config.critical_threshold,
        )
    }

    fn score_categories(&self, hits: &[KeywordHit]) -> BTreeMap<String, CategoryAssessment> {
        let mut grouped: BTreeMap<&str, Vec<&KeywordHit>> = BTreeMap::new();
        for hit in hits {
            grouped.entry(hit.category.as_str()).or_default().push(hit);
        }

        grouped
            .into_iter()
            .map(|(category, hits)| {
                let points: f64 = hits
                    .iter()
                    .map(|h| REPEAT_HIT_POINTS.mul_add(f64::from(h.occurrences - 1), FIRST_HIT_POINTS))
                    .sum();
                let score = round_to((self.profile.weight(category) * points).min(MAX_SCORE), 2);
                let risk_level = self.level(score);
                #[allow(clippy::cast_precision_loss)]
                let confidence = CONFIDENCE_PER_KEYWORD
                    .mul_add(hits.len() as f64, BASE_CONFIDENCE)
                    .min(MAX_CONFIDENCE);
                let recommendations = if risk_level >= RiskLevel::Medium {
                    profile::recommendations(category)
                } else {
                    Vec::new()
                };

                (
                    category.to_string(),
                    CategoryAssessment {
                        category: category.to_string(),
                        label: profile::category_label(category),
                        score,
                        risk_level,
                        confidence,
                        keywords: hits.iter().map(|h| h.keyword.clone()).collect(),
                        recommendations,
                    },
                )
            })
            .collect()
    }
}

/// Highest category score plus a quarter of the rest, capped at 100.
fn overall_score(categories: &BTreeMap<String, CategoryAssessment>) -> f64 {
    let max = categories.values().map(|c| c.score).fold(0.0, f64::max);
    let total: f64 = categories.values().map(|c| c.score).sum();
    round_to(
        SECONDARY_CATEGORY_SHARE.mul_add(total - max, max).min(MAX_SCORE),
        2,
    )
}
