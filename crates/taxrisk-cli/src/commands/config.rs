use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use taxrisk_config::TaxRiskConfig;
use taxrisk_core::entities::KeywordProfile;
use taxrisk_engine::profile;
use taxrisk_schema::SchemaRegistry;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::parse::read_json;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ProfileSummary {
    valid: bool,
    categories: Vec<String>,
    keywords: usize,
}

impl From<&KeywordProfile> for ProfileSummary {
    fn from(profile: &KeywordProfile) -> Self {
        Self {
            valid: true,
            categories: profile.risk_keywords.keys().cloned().collect(),
            keywords: profile.risk_keywords.values().map(Vec::len).sum(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AppliedProfile {
    installed: String,
    #[serde(flatten)]
    summary: ProfileSummary,
}

/// Handle `taxrisk config show`. Table output prints the config as TOML.
pub fn show(config: &TaxRiskConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    if flags.format == OutputFormat::Table {
        let rendered = toml::to_string_pretty(config).context("failed to render config")?;
        print!("{rendered}");
        return Ok(());
    }
    output(config, flags.format)
}

/// Handle `taxrisk config validate`.
pub fn validate(file: &str, flags: &GlobalFlags) -> anyhow::Result<()> {
    let profile = check_profile(file)?;
    output(&ProfileSummary::from(&profile), flags.format)
}

/// Handle `taxrisk config apply`: install the profile as `.taxrisk/keywords.json`.
pub async fn apply(file: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let profile = check_profile(file)?;
    let summary = ProfileSummary::from(&profile);

    let target = ctx.keyword_profile_path();
    let rendered = serde_json::to_string_pretty(&profile)?;
    std::fs::write(&target, rendered)
        .with_context(|| format!("failed to write {}", target.display()))?;

    ctx.service
        .record_config_applied(file, summary.categories.clone())
        .await?;

    if ctx.config.engine.has_keyword_profile() {
        tracing::warn!(
            configured = %ctx.config.engine.keyword_profile,
            "engine.keyword_profile is set in config and takes precedence over the applied profile"
        );
    }

    output(
        &AppliedProfile {
            installed: target.display().to_string(),
            summary,
        },
        flags.format,
    )
}

/// Handle `taxrisk config schema`.
pub fn schema(name: Option<&str>, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    match name {
        None => output(&registry.list(), flags.format),
        Some(name) => {
            let schema = registry.get(name).with_context(|| {
                format!(
                    "unknown schema '{name}' (available: {})",
                    registry.list().join(", ")
                )
            })?;
            output(schema, flags.format)
        }
    }
}

/// Validate a keyword profile against its JSON Schema and the semantic rules.
fn check_profile(file: &str) -> anyhow::Result<KeywordProfile> {
    let value = read_json(file)?;
    SchemaRegistry::new()
        .validate("keyword_profile", &value)
        .with_context(|| format!("{file} does not match the keyword profile schema"))?;
    profile::load_profile(Path::new(file)).with_context(|| format!("{file} is not a usable keyword profile"))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, body: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path.display().to_string()
    }

    #[test]
    fn accepts_well_formed_profile() {
        let dir = TempDir::new().unwrap();
        let file = write(
            &dir,
            "profile.json",
            r#"{"risk_keywords": {"state_tax": ["nexus", "apportionment"]}, "risk_weights": {"state_tax": 1.5}}"#,
        );
        let profile = check_profile(&file).unwrap();
        let summary = ProfileSummary::from(&profile);
        assert_eq!(summary.categories, vec!["state_tax"]);
        assert_eq!(summary.keywords, 2);
    }

    #[test]
    fn rejects_schema_violations() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "profile.json", r#"{"risk_keywords": ["nexus"]}"#);
        let err = check_profile(&file).unwrap_err();
        assert!(format!("{err:#}").contains("schema"));
    }

    #[test]
    fn rejects_semantic_violations() {
        let dir = TempDir::new().unwrap();
        let file = write(
            &dir,
            "profile.json",
            r#"{"risk_keywords": {"state_tax": ["nexus"]}, "risk_weights": {"state_tax": -1}}"#,
        );
        assert!(check_profile(&file).is_err());
    }
}
