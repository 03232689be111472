use cast_config::CastConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: CastConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => commands::serve::handle(&args, config).await,
        Commands::Validate(args) => commands::validate::handle(&args, &config, flags).await,
        Commands::Task { action } => commands::task::handle(&action, &config, flags).await,
        Commands::Stats => commands::stats::handle(&config, flags).await,
    }
}
