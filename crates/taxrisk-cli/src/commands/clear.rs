use crate::cli::GlobalFlags;
use crate::cli::root_commands::ClearArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `taxrisk clear`.
pub async fn handle(args: &ClearArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !args.yes {
        anyhow::bail!("refusing to delete every stored analysis without --yes");
    }
    let cleared = ctx.service.clear_all().await?;
    output(&cleared, flags.format)
}
