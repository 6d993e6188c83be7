use taxrisk_db::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `taxrisk audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = AuditFilter {
        entity_type: args
            .entity_type
            .as_deref()
            .map(|v| parse_enum(v, "entity type"))
            .transpose()?,
        entity_id: args.entity_id.clone(),
        action: args
            .action
            .as_deref()
            .map(|v| parse_enum(v, "action"))
            .transpose()?,
        limit: Some(effective_limit(
            args.limit,
            flags.limit,
            ctx.config.general.default_limit,
        )),
    };

    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}
