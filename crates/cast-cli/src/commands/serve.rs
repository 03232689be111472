use anyhow::Context;

use cast_config::CastConfig;

use crate::cli::root_commands::ServeArgs;

/// Handle `tgcast serve`.
pub async fn handle(args: &ServeArgs, mut config: CastConfig) -> anyhow::Result<()> {
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!(
        bind = %config.server.bind_addr(),
        store = %config.store.path,
        "starting tgcast"
    );
    cast_server::run(&config)
        .await
        .context("tgcast server stopped with an error")
}
