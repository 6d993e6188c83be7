use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use taxrisk_config::{PROJECT_DIR, TaxRiskConfig};
use taxrisk_db::TaxService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: String,
    database: String,
    config: String,
    config_written: bool,
}

/// Handle `taxrisk init`: create `.taxrisk/`, a default config, and the database.
pub async fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = match flags.project.as_deref() {
        Some(path) => {
            let path = PathBuf::from(path);
            if path.file_name().is_some_and(|name| name == PROJECT_DIR) {
                path.parent().map(PathBuf::from).unwrap_or(path)
            } else {
                path
            }
        }
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    let state_dir = root.join(PROJECT_DIR);
    std::fs::create_dir_all(&state_dir)
        .with_context(|| format!("failed to create {}", state_dir.display()))?;

    let config_path = TaxRiskConfig::project_config_path(Some(&root));
    let config_written = args.force || !config_path.exists();
    if config_written {
        let rendered = toml::to_string_pretty(&TaxRiskConfig::default())
            .context("failed to render default config")?;
        std::fs::write(&config_path, rendered)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
    }

    let db_path = AppContext::database_path(&root);
    TaxService::new_local(&db_path.to_string_lossy())
        .await
        .with_context(|| format!("failed to create database at {}", db_path.display()))?;

    tracing::info!(root = %root.display(), config_written, "initialized taxrisk project");
    output(
        &InitResponse {
            project_root: root.display().to_string(),
            database: db_path.display().to_string(),
            config: config_path.display().to_string(),
            config_written,
        },
        flags.format,
    )
}
