use serde::Serialize;
use taxrisk_core::entities::AnalysisRecord;
use taxrisk_core::enums::RiskLevel;
use taxrisk_core::responses::AnalysisListResponse;

use crate::cli::subcommands::AnalysisCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// One-line view of an analysis for table output.
#[derive(Debug, Serialize)]
pub struct AnalysisRow<'a> {
    id: &'a str,
    document: &'a str,
    score: f64,
    level: RiskLevel,
    top_category: &'a str,
    p90: f64,
    escrow_adequate: bool,
    source: &'a str,
    created_at: String,
}

impl<'a> From<&'a AnalysisRecord> for AnalysisRow<'a> {
    fn from(record: &'a AnalysisRecord) -> Self {
        let result = &record.result;
        Self {
            id: &record.id,
            document: &result.document_name,
            score: result.overall_risk_score,
            level: result.risk_level,
            top_category: result
                .categories_by_score()
                .into_iter()
                .next()
                .map_or("-", |c| c.label.as_str()),
            p90: result.expected_tax_contingency.p90,
            escrow_adequate: result.escrow_adequacy.adequate,
            source: record.source.as_str(),
            created_at: record.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Print a stored analysis, summarized to one row for tables.
pub fn output_record(record: &AnalysisRecord, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => output(&AnalysisRow::from(record), format),
        OutputFormat::Json | OutputFormat::Raw => output(record, format),
    }
}

#[derive(Debug, Serialize)]
struct DeleteResponse<'a> {
    deleted: &'a str,
}

/// Handle `taxrisk analysis`.
pub async fn handle(
    action: &AnalysisCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AnalysisCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            let analyses = ctx.service.list_analyses(limit).await?;
            if flags.format == OutputFormat::Table {
                let rows: Vec<AnalysisRow<'_>> = analyses.iter().map(AnalysisRow::from).collect();
                return output(&rows, flags.format);
            }
            output(&AnalysisListResponse { analyses }, flags.format)
        }
        AnalysisCommands::Get { id } => {
            let record = ctx.service.get_analysis(id).await?;
            output_record(&record, flags.format)
        }
        AnalysisCommands::Delete { id } => {
            ctx.service.delete_analysis(id).await?;
            output(&DeleteResponse { deleted: id }, flags.format)
        }
    }
}
