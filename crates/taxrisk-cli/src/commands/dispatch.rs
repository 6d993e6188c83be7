use taxrisk_config::TaxRiskConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::cli::subcommands::ConfigCommands;
use crate::commands;
use crate::context::AppContext;

/// Run commands that need no project database.
///
/// Returns `None` when the command needs an [`AppContext`].
pub fn dispatch_stateless(
    command: &Commands,
    config: &TaxRiskConfig,
    flags: &GlobalFlags,
) -> Option<anyhow::Result<()>> {
    match command {
        Commands::Quarterly(args) => Some(commands::quarterly::handle(args, config, flags)),
        Commands::Config { action } => match action {
            ConfigCommands::Show => Some(commands::config::show(config, flags)),
            ConfigCommands::Validate { file } => Some(commands::config::validate(file, flags)),
            ConfigCommands::Schema { name } => {
                Some(commands::config::schema(name.as_deref(), flags))
            }
            ConfigCommands::Apply { .. } => None,
        },
        _ => None,
    }
}

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Analyze(args) => commands::analyze::handle(&args, &ctx, flags).await,
        Commands::Analysis { action } => commands::analysis::handle(&action, &ctx, flags).await,
        Commands::Report(args) => commands::report::handle(&args, &ctx, flags).await,
        Commands::Dashboard => commands::dashboard::handle_dashboard(&ctx, flags).await,
        Commands::History => commands::dashboard::handle_history(&ctx, flags).await,
        Commands::Search(args) => commands::search::handle(&args, &ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, &ctx, flags).await,
        Commands::Clear(args) => commands::clear::handle(&args, &ctx, flags).await,
        Commands::Export(args) => commands::export::handle(&args, &ctx, flags).await,
        Commands::ExportAll(args) => commands::export::handle_all(&args, &ctx, flags).await,
        Commands::Import(args) => commands::import::handle(&args, &ctx, flags).await,
        Commands::Config {
            action: ConfigCommands::Apply { file },
        } => commands::config::apply(&file, &ctx, flags).await,
        Commands::Serve(args) => commands::serve::handle(&args, ctx).await,
        Commands::Init(_) | Commands::Quarterly(_) | Commands::Config { .. } => {
            unreachable!("init/quarterly/config are pre-dispatched in main")
        }
    }
}
