use anyhow::Context;

use cast_config::CastConfig;

use crate::cli::GlobalFlags;

/// Load `.env` from the working directory, then the layered config.
pub fn load_config() -> anyhow::Result<CastConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(error) if error.not_found() => {}
        Err(error) => return Err(error).context("failed to load .env"),
    }
    CastConfig::load().context("failed to load tgcast configuration")
}

/// Server base URL for remote commands: `--server` wins over config.
pub fn server_url(flags: &GlobalFlags, config: &CastConfig) -> String {
    flags
        .server
        .clone()
        .unwrap_or_else(|| config.cli.server_url.clone())
        .trim_end_matches('/')
        .to_string()
}
