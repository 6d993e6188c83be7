use serde::Serialize;
use taxrisk_core::responses::DocumentSearchHit;

use crate::cli::root_commands::SearchArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SearchRow<'a> {
    document_id: &'a str,
    name: &'a str,
    analysis_id: &'a str,
    snippet: &'a str,
}

impl<'a> From<&'a DocumentSearchHit> for SearchRow<'a> {
    fn from(hit: &'a DocumentSearchHit) -> Self {
        Self {
            document_id: &hit.document.id,
            name: &hit.document.name,
            analysis_id: hit.analysis_id.as_deref().unwrap_or("-"),
            snippet: &hit.snippet,
        }
    }
}

/// Handle `taxrisk search`.
pub async fn handle(args: &SearchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(args.limit, flags.limit, ctx.config.general.default_limit);
    let hits = ctx.service.search_documents(&args.query, limit).await?;
    tracing::debug!(query = %args.query, hits = hits.len(), "document search");

    if flags.format == OutputFormat::Table {
        let rows: Vec<SearchRow<'_>> = hits.iter().map(SearchRow::from).collect();
        return output(&rows, flags.format);
    }
    output(&hits, flags.format)
}
