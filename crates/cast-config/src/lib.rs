//! # cast-config
//!
//! Layered configuration loading for tgcast using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TGCAST_*` prefix, `__` as separator)
//! 2. The bare `PORT` variable (maps to `server.port`, for PaaS hosts)
//! 3. Project-level `./tgcast.toml`
//! 4. User-level `~/.config/tgcast/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TGCAST_SERVER__PORT` -> `server.port`,
//! `TGCAST_TELEGRAM__API_BASE` -> `telegram.api_base`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use cast_config::CastConfig;
//!
//! let config = CastConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

mod cli;
mod dispatch;
mod error;
mod server;
mod store;
mod telegram;

pub use cli::CliConfig;
pub use dispatch::DispatchConfig;
pub use error::ConfigError;
pub use server::ServerConfig;
pub use store::StoreConfig;
pub use telegram::TelegramConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const PROJECT_CONFIG_FILE: &str = "tgcast.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CastConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub cli: CliConfig,
}

impl CastConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed and
    /// `ConfigError::InvalidValue` if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: PaaS-style PORT
        figment = figment.merge(
            Env::raw().filter_map(|key| (key == "port").then(|| "server.port".into())),
        );

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("TGCAST_").split("__"))
    }

    /// Reject values that would make the dispatcher misbehave.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "telegram.timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        let delay = self.dispatch.default_delay_secs;
        if !delay.is_finite() || delay <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "dispatch.default_delay_secs",
                reason: format!("must be a positive number, got {delay}"),
            });
        }
        if self.store.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.path",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tgcast").join("config.toml"))
    }
}
