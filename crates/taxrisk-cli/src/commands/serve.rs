use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use taxrisk_server::AppState;

use crate::cli::root_commands::ServeArgs;
use crate::context::AppContext;

/// Handle `taxrisk serve`. Runs until the process is stopped.
pub async fn handle(args: &ServeArgs, ctx: AppContext) -> anyhow::Result<()> {
    let addr: SocketAddr = match &args.bind {
        Some(bind) => bind
            .parse()
            .with_context(|| format!("invalid --bind address '{bind}'"))?,
        None => ctx.config.server.socket_addr()?,
    };

    let AppContext {
        service,
        engine,
        config,
        project_root,
    } = ctx;
    tracing::info!(root = %project_root.display(), %addr, "starting taxrisk server");

    let state = AppState::new(service, engine, config.quarterly, config.general.default_limit);
    taxrisk_server::serve(addr, Arc::new(state))
        .await
        .with_context(|| format!("server on {addr} failed"))
}
