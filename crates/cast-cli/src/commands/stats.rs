use cast_config::CastConfig;

use crate::bootstrap::server_url;
use crate::cli::GlobalFlags;
use crate::client::ApiClient;
use crate::output::output;

/// Handle `tgcast stats`.
pub async fn handle(config: &CastConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = ApiClient::new(server_url(flags, config))?;
    output(&client.stats().await?, flags.format)
}
