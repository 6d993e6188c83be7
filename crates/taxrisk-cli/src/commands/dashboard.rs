use taxrisk_engine::{dashboard, history};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `taxrisk dashboard`.
pub async fn handle_dashboard(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let records = ctx.service.analyses_chronological().await?;
    output(&dashboard::summarize(&records), flags.format)
}

/// Handle `taxrisk history`.
pub async fn handle_history(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let records = ctx.service.analyses_chronological().await?;
    output(&history::summarize(&records)?, flags.format)
}
