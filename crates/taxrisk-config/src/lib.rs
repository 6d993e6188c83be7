//! # taxrisk-config
//!
//! Layered configuration loading for taxrisk using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TAXRISK_*` prefix, `__` as separator)
//! 2. Project-level `.taxrisk/config.toml`
//! 3. User-level `~/.config/taxrisk/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TAXRISK_ENGINE__EXPOSURE_BASE` -> `engine.exposure_base`,
//! `TAXRISK_SERVER__BIND` -> `server.bind`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use taxrisk_config::TaxRiskConfig;
//!
//! let config = TaxRiskConfig::load_with_dotenv(None).expect("config");
//! println!("exposure base: {}", config.engine.exposure_base);
//! ```

mod engine;
mod error;
mod general;
mod quarterly;
mod server;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use quarterly::QuarterlyConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project state directory.
pub const PROJECT_DIR: &str = ".taxrisk";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TaxRiskConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub quarterly: QuarterlyConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl TaxRiskConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// `project_root` is the directory containing `.taxrisk/`; when `None`
    /// the current directory is used.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from `project_root` (or the current directory) before
    /// building the figment. This is the typical entry point for the CLI.
    pub fn load_with_dotenv(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        match project_root.map(|root| root.join(".env")) {
            Some(env_path) if env_path.exists() => {
                let _ = dotenvy::from_path(&env_path);
            }
            _ => {
                let _ = dotenvy::dotenv();
            }
        }
        Self::load(project_root)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment(project_root: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = Self::project_config_path(project_root);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("TAXRISK_").split("__"))
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.quarterly.validate()?;
        self.server.socket_addr()?;
        Ok(())
    }

    /// Path of the project-local config file.
    #[must_use]
    pub fn project_config_path(project_root: Option<&Path>) -> PathBuf {
        project_root
            .map_or_else(PathBuf::new, Path::to_path_buf)
            .join(PROJECT_DIR)
            .join("config.toml")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("taxrisk").join("config.toml"))
    }
}
