use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ExportAllArgs, ExportArgs};
use crate::context::AppContext;
use crate::output::output;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
struct ExportWritten<'a> {
    analysis_id: &'a str,
    path: &'a str,
}

#[derive(Debug, Serialize)]
struct BulkExportResponse<'a> {
    exported: usize,
    path: &'a str,
}

/// Handle `taxrisk export`.
pub async fn handle(args: &ExportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let envelope = ctx.service.export_envelope(&args.id, APP_VERSION).await?;

    let Some(path) = &args.out else {
        output(&envelope, flags.format)?;
        ctx.service.audit_export(&args.id, None).await?;
        return Ok(());
    };

    let rendered = serde_json::to_string_pretty(&envelope)?;
    std::fs::write(path, rendered).with_context(|| format!("failed to write {path}"))?;
    ctx.service.audit_export(&args.id, Some(path.as_str())).await?;
    output(
        &ExportWritten {
            analysis_id: &args.id,
            path,
        },
        flags.format,
    )
}

/// Handle `taxrisk export-all`.
pub async fn handle_all(
    args: &ExportAllArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let exported = ctx
        .service
        .export_all(Path::new(&args.out), APP_VERSION)
        .await
        .with_context(|| format!("failed to export to {}", args.out))?;
    output(
        &BulkExportResponse {
            exported,
            path: &args.out,
        },
        flags.format,
    )
}
