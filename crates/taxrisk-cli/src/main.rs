#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

use anyhow::Context;
use clap::Parser;
use taxrisk_config::TaxRiskConfig;

mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("taxrisk error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    if let cli::Commands::Init(args) = &cli.command {
        return commands::init::handle(args, &flags).await;
    }

    // Config loads without a project so stateless commands work anywhere.
    let project_root = match flags.project.as_deref() {
        Some(path) => Some(context::resolve_project_root(Some(path))?),
        None => std::env::current_dir()
            .ok()
            .and_then(|cwd| context::find_project_root(&cwd)),
    };
    let config = TaxRiskConfig::load_with_dotenv(project_root.as_deref())
        .context("failed to load configuration")?;

    let command = cli.command;
    if let Some(result) = commands::dispatch::dispatch_stateless(&command, &config, &flags) {
        return result;
    }

    let project_root = match project_root {
        Some(root) => root,
        None => context::resolve_project_root(None)?,
    };
    let ctx = context::AppContext::init(project_root, config)
        .await
        .context("failed to initialize taxrisk application context")?;

    commands::dispatch::dispatch(command, ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TAXRISK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
