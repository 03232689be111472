//! Telegram Bot API client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Base URL of the Bot API. Point at a local mock for testing.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TelegramConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
