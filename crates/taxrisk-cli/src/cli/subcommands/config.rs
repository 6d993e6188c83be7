use clap::Subcommand;

/// Configuration and keyword profile commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration.
    Show,
    /// Check a keyword profile JSON file without applying it.
    Validate { file: String },
    /// Install a keyword profile for this project.
    Apply { file: String },
    /// Dump the JSON Schema for a registered type, or list the names.
    Schema { name: Option<String> },
}
