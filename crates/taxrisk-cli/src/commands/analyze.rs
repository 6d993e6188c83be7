use std::path::Path;

use anyhow::Context;
use taxrisk_core::entities::AnalysisRecord;
use taxrisk_core::enums::AnalysisSource;
use taxrisk_db::NewDocument;
use taxrisk_engine::extract;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnalyzeArgs;
use crate::commands::analysis::output_record;
use crate::context::AppContext;
use crate::progress::Progress;

/// Handle `taxrisk analyze`.
pub async fn handle(args: &AnalyzeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let progress = Progress::spinner(&format!("Analyzing {}", args.file));
    match analyze(args, ctx, &progress).await {
        Ok(record) => {
            progress.finish_clear();
            output_record(&record, flags.format)
        }
        Err(error) => {
            progress.finish_err("analysis failed");
            Err(error)
        }
    }
}

async fn analyze(
    args: &AnalyzeArgs,
    ctx: &AppContext,
    progress: &Progress,
) -> anyhow::Result<AnalysisRecord> {
    if args.escrow.is_some_and(|escrow| !escrow.is_finite() || escrow < 0.0) {
        anyhow::bail!("--escrow must be a non-negative amount");
    }

    let doc = extract::extract_file(Path::new(&args.file), ctx.config.engine.max_document_bytes)
        .with_context(|| format!("failed to read {}", args.file))?;
    let name = args.name.clone().unwrap_or(doc.name);

    let result = ctx
        .engine
        .analyze(&name, &doc.text, args.escrow.unwrap_or(0.0))
        .with_context(|| format!("failed to analyze {name}"))?;

    progress.set_message("Saving analysis");
    let record = ctx
        .service
        .record_analysis(
            &NewDocument {
                name: &name,
                format: doc.format,
                content: &doc.text,
                original_counts: None,
            },
            &result,
            AnalysisSource::Upload,
        )
        .await
        .context("failed to store analysis")?;

    tracing::info!(
        id = %record.id,
        score = record.result.overall_risk_score,
        level = %record.result.risk_level,
        "analysis stored"
    );
    Ok(record)
}
