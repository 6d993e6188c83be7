use std::path::Path;

use anyhow::Context;
use taxrisk_core::responses::ImportResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::commands::shared::parse::read_json;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `taxrisk import`: one `.json` envelope, or a `.jsonl` file of them.
pub async fn handle(args: &ImportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let path = Path::new(&args.file);
    let is_jsonl = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"));

    let response = if is_jsonl {
        let progress = Progress::spinner(&format!("Importing {}", args.file));
        let result = ctx.service.import_jsonl(path).await;
        progress.finish_clear();
        result.with_context(|| format!("failed to import {}", args.file))?
    } else {
        let value = read_json(&args.file)?;
        let record = ctx
            .service
            .import_envelope(&value)
            .await
            .with_context(|| format!("failed to import {}", args.file))?;
        ImportResponse {
            imported: vec![record.id],
            skipped: 0,
        }
    };

    if response.skipped > 0 {
        tracing::warn!(skipped = response.skipped, "some lines were not imported");
    }
    output(&response, flags.format)
}
