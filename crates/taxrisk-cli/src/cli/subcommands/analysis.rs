use clap::Subcommand;

/// Stored analysis commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AnalysisCommands {
    /// List analyses, newest first.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get an analysis by ID.
    Get { id: String },
    /// Delete an analysis and its document.
    Delete { id: String },
}
