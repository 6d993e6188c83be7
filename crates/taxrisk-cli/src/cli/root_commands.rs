use clap::{Args, Subcommand};

use crate::cli::subcommands::{AnalysisCommands, ConfigCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Initialize taxrisk for a project.
    Init(InitArgs),
    /// Analyze a document and store the result.
    Analyze(AnalyzeArgs),
    /// Stored analyses.
    Analysis {
        #[command(subcommand)]
        action: AnalysisCommands,
    },
    /// Render a detailed markdown report for an analysis.
    Report(ReportArgs),
    /// Portfolio rollup across all stored analyses.
    Dashboard,
    /// Risk score trend over time.
    History,
    /// Full-text search over analyzed documents.
    Search(SearchArgs),
    /// View audit trail.
    Audit(AuditArgs),
    /// Remove every stored analysis and document.
    Clear(ClearArgs),
    /// Export one analysis as a JSON envelope.
    Export(ExportArgs),
    /// Export every analysis to a JSONL file.
    ExportAll(ExportAllArgs),
    /// Import a JSON export envelope or a JSONL bulk export.
    Import(ImportArgs),
    /// Keyword profile and configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Forecast quarterly penalties and late filings and flag volatility.
    Quarterly(QuarterlyArgs),
    /// Run the HTTP API.
    Serve(ServeArgs),
}

/// Arguments for `taxrisk init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml with defaults.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `taxrisk analyze`.
#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    /// Document to analyze (.txt, .md, .html, .json, .csv).
    pub file: String,
    /// Display name stored with the analysis (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
    /// Escrow currently held against tax exposure.
    #[arg(long)]
    pub escrow: Option<f64>,
}

/// Arguments for `taxrisk report`.
#[derive(Clone, Debug, Args)]
pub struct ReportArgs {
    pub id: String,
    /// Write the report to this file instead of stdout.
    #[arg(long)]
    pub out: Option<String>,
}

/// Arguments for `taxrisk search`.
#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    pub query: String,
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Arguments for `taxrisk audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Filter by entity type (document, analysis, config).
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    /// Filter by action (created, imported, exported, deleted, cleared, config_applied).
    #[arg(long)]
    pub action: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Arguments for `taxrisk clear`.
#[derive(Clone, Debug, Args)]
pub struct ClearArgs {
    /// Confirm deletion of all stored data.
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for `taxrisk export`.
#[derive(Clone, Debug, Args)]
pub struct ExportArgs {
    pub id: String,
    /// Write the envelope to this file instead of stdout.
    #[arg(long)]
    pub out: Option<String>,
}

/// Arguments for `taxrisk export-all`.
#[derive(Clone, Debug, Args)]
pub struct ExportAllArgs {
    /// Destination JSONL file.
    pub out: String,
}

/// Arguments for `taxrisk import`.
#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// `.json` envelope or `.jsonl` bulk export.
    pub file: String,
}

/// Arguments for `taxrisk quarterly`.
#[derive(Clone, Debug, Args)]
pub struct QuarterlyArgs {
    /// JSON file with `quarters`, `penalty_per_year`, `percent_returns_late`.
    #[arg(long, conflicts_with_all = ["quarter", "penalty", "late"])]
    pub input: Option<String>,
    /// Quarter labels like 2023-Q1, oldest first.
    #[arg(long, value_delimiter = ',')]
    pub quarter: Vec<String>,
    /// Penalty amounts, one per quarter.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub penalty: Vec<f64>,
    /// Percent of returns filed late, one per quarter.
    #[arg(long, value_delimiter = ',')]
    pub late: Vec<f64>,
}

/// Arguments for `taxrisk serve`.
#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address (defaults to `server.bind` from config).
    #[arg(long)]
    pub bind: Option<String>,
}
