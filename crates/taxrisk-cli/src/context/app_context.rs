use std::path::{Path, PathBuf};

use anyhow::Context;
use taxrisk_config::{PROJECT_DIR, TaxRiskConfig};
use taxrisk_core::entities::KeywordProfile;
use taxrisk_db::TaxService;
use taxrisk_engine::{RiskEngine, profile};

/// Keyword profile installed by `taxrisk config apply`.
pub const KEYWORD_PROFILE_FILE: &str = "keywords.json";

const DATABASE_FILE: &str = "taxrisk.db";

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: TaxService,
    pub engine: RiskEngine,
    pub config: TaxRiskConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the project database and build the risk engine.
    pub async fn init(project_root: PathBuf, config: TaxRiskConfig) -> anyhow::Result<Self> {
        let db_path = Self::database_path(&project_root);
        let service = TaxService::new_local(&db_path.to_string_lossy())
            .await
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;

        let profile = load_profile(&project_root, &config)?;
        let engine = RiskEngine::new(
            profile,
            config.engine.clone(),
            config.general.preview_chars,
        )
        .context("failed to build risk engine")?;

        tracing::debug!(
            root = %project_root.display(),
            categories = engine.profile().risk_keywords.len(),
            "application context ready"
        );

        Ok(Self {
            service,
            engine,
            config,
            project_root,
        })
    }

    #[must_use]
    pub fn database_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR).join(DATABASE_FILE)
    }

    #[must_use]
    pub fn keyword_profile_path(&self) -> PathBuf {
        self.project_root.join(PROJECT_DIR).join(KEYWORD_PROFILE_FILE)
    }
}

/// Pick the keyword profile for a project.
///
/// `engine.keyword_profile` from config wins, then an applied
/// `.taxrisk/keywords.json`, then the built-in profile.
pub fn load_profile(project_root: &Path, config: &TaxRiskConfig) -> anyhow::Result<KeywordProfile> {
    if let Some(path) = config.engine.keyword_profile_path(project_root) {
        return profile::load_profile(&path)
            .with_context(|| format!("failed to load keyword profile {}", path.display()));
    }

    let applied = project_root.join(PROJECT_DIR).join(KEYWORD_PROFILE_FILE);
    if applied.is_file() {
        return profile::load_profile(&applied)
            .with_context(|| format!("failed to load keyword profile {}", applied.display()));
    }

    Ok(profile::default_profile())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn project() -> TempDir {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(PROJECT_DIR)).expect(".taxrisk should create");
        temp
    }

    #[test]
    fn falls_back_to_builtin_profile() {
        let temp = project();
        let loaded = load_profile(temp.path(), &TaxRiskConfig::default()).unwrap();
        assert_eq!(loaded, profile::default_profile());
    }

    #[test]
    fn applied_profile_replaces_builtin() {
        let temp = project();
        std::fs::write(
            temp.path().join(PROJECT_DIR).join(KEYWORD_PROFILE_FILE),
            r#"{"risk_keywords": {"state_tax": ["nexus"]}}"#,
        )
        .unwrap();

        let loaded = load_profile(temp.path(), &TaxRiskConfig::default()).unwrap();
        assert_eq!(loaded.risk_keywords.len(), 1);
    }

    #[test]
    fn configured_profile_wins_over_applied() {
        let temp = project();
        std::fs::write(
            temp.path().join(PROJECT_DIR).join(KEYWORD_PROFILE_FILE),
            r#"{"risk_keywords": {"state_tax": ["nexus"]}}"#,
        )
        .unwrap();
        std::fs::write(
            temp.path().join("custom.json"),
            r#"{"risk_keywords": {"transfer_pricing": ["royalty"], "state_tax": ["nexus"]}}"#,
        )
        .unwrap();

        let mut config = TaxRiskConfig::default();
        config.engine.keyword_profile = "custom.json".into();
        let loaded = load_profile(temp.path(), &config).unwrap();
        assert_eq!(loaded.risk_keywords.len(), 2);
    }

    #[test]
    fn broken_profile_is_an_error() {
        let temp = project();
        std::fs::write(
            temp.path().join(PROJECT_DIR).join(KEYWORD_PROFILE_FILE),
            "{not json",
        )
        .unwrap();
        assert!(load_profile(temp.path(), &TaxRiskConfig::default()).is_err());
    }
}
