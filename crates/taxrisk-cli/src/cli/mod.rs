use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `taxrisk` binary.
#[derive(Debug, Parser)]
#[command(
    name = "taxrisk",
    version,
    about = "Tax risk analysis for due diligence documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .taxrisk)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{AnalysisCommands, ConfigCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "taxrisk",
            "--format",
            "table",
            "--limit",
            "10",
            "--verbose",
            "dashboard",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Dashboard));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["taxrisk", "history", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::History));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["taxrisk", "--format", "xml", "dashboard"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn analyze_accepts_name_and_escrow() {
        let cli = Cli::try_parse_from([
            "taxrisk",
            "analyze",
            "memo.txt",
            "--name",
            "Target memo",
            "--escrow",
            "250000",
        ])
        .expect("cli should parse");

        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.file, "memo.txt");
        assert_eq!(args.name.as_deref(), Some("Target memo"));
        assert_eq!(args.escrow, Some(250_000.0));
    }

    #[test]
    fn nested_subcommands_parse() {
        let cli = Cli::try_parse_from(["taxrisk", "analysis", "get", "ana-0000beef"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Analysis {
                action: AnalysisCommands::Get { ref id }
            } if id == "ana-0000beef"
        ));

        let cli = Cli::try_parse_from(["taxrisk", "config", "schema", "keyword_profile"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigCommands::Schema { name: Some(_) }
            }
        ));
    }

    #[test]
    fn quarterly_collects_repeated_values() {
        let cli = Cli::try_parse_from([
            "taxrisk",
            "quarterly",
            "--quarter",
            "2023-Q1",
            "--quarter",
            "2023-Q2",
            "--penalty",
            "100",
            "--penalty",
            "120",
            "--late",
            "4.5",
            "--late",
            "5",
        ])
        .expect("cli should parse");

        let Commands::Quarterly(args) = cli.command else {
            panic!("expected quarterly");
        };
        assert_eq!(args.quarter, vec!["2023-Q1", "2023-Q2"]);
        assert_eq!(args.penalty, vec![100.0, 120.0]);
        assert_eq!(args.late, vec![4.5, 5.0]);
    }

    #[test]
    fn quarterly_input_conflicts_with_inline_series() {
        let parsed = Cli::try_parse_from([
            "taxrisk",
            "quarterly",
            "--input",
            "q.json",
            "--quarter",
            "2023-Q1",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["taxrisk", "--project", "/tmp/demo", "dashboard"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }
}
