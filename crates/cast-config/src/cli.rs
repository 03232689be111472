//! Settings for remote CLI commands.

use serde::{Deserialize, Serialize};

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Base URL of a running `tgcast serve`.
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
        }
    }
}
