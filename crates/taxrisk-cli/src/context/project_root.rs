use std::path::{Path, PathBuf};

use anyhow::Context;
use taxrisk_config::PROJECT_DIR;

/// Walk upwards from `start` until a `.taxrisk` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_DIR).is_dir())
        .map(Path::to_path_buf)
}

/// Resolve the project root from `--project` or the current directory.
///
/// An explicit path may point at the project itself or at its `.taxrisk`
/// directory.
pub fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);

        if explicit.file_name().is_some_and(|name| name == PROJECT_DIR) {
            return explicit
                .parent()
                .map(Path::to_path_buf)
                .context("invalid --project path: '.taxrisk' directory has no parent");
        }

        if explicit.join(PROJECT_DIR).is_dir() {
            return Ok(explicit);
        }

        anyhow::bail!(
            "invalid --project '{}': no .taxrisk directory. Run 'taxrisk init' there first.",
            explicit.display()
        );
    }

    let start = std::env::current_dir().context("failed to read current directory")?;
    find_project_root(&start)
        .context("not a taxrisk project (no .taxrisk directory found). Run 'taxrisk init' first.")
}
