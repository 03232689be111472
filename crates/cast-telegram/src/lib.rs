//! # cast-telegram
//!
//! Telegram Bot API client for tgcast.
//!
//! Covers the handful of methods the dispatcher needs:
//! - `getMe` (credential validation, see [`TelegramClient::validate_token`])
//! - `sendMessage`
//! - `sendPhoto` by URL and by multipart upload
//! - `sendChatAction` (the "typing…" indicator)
//!
//! The [`Messenger`] trait is the seam the dispatch engine is written
//! against, so it can be driven by an in-memory fake in tests.

mod error;
mod http;
mod messenger;
mod methods;

pub use error::TelegramError;
pub use crate::http::DEFAULT_RETRY_AFTER_SECS;
pub use messenger::{Messenger, Outgoing};

use cast_config::TelegramConfig;
use cast_core::identity::{BotIdentity, Validation};

/// HTTP client for the Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
}

impl TelegramClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Http`] if the underlying `reqwest::Client`
    /// fails to build (e.g. the TLS backend cannot initialize).
    pub fn from_config(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tgcast/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// `https://api.telegram.org/bot<token>/<method>`
    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{token}/{method}", self.api_base)
    }

    /// Check a token against `getMe`.
    ///
    /// Never fails: transport errors, non-200 answers and malformed bodies
    /// all come back as `valid: false`.
    pub async fn validate_token(&self, token: &str) -> Validation {
        if token.trim().is_empty() || token.contains('/') {
            return Validation::invalid();
        }
        match self.get_me(token).await {
            Ok(identity) => Validation::valid(identity),
            Err(error) => {
                tracing::debug!(
                    token = %cast_core::responses::mask_token(token),
                    %error,
                    "token rejected"
                );
                Validation::invalid()
            }
        }
    }

    /// Raw `getMe`.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] on transport, status or parse failures.
    pub async fn get_me(&self, token: &str) -> Result<BotIdentity, TelegramError> {
        #[derive(serde::Deserialize)]
        struct User {
            id: i64,
            first_name: String,
            username: Option<String>,
        }

        let resp = self.http.get(self.method_url(token, "getMe")).send().await?;
        let user: User = crate::http::into_result(resp).await?;
        Ok(BotIdentity {
            id: user.id,
            username: user.username.unwrap_or_default(),
            first_name: user.first_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(base: &str) -> TelegramClient {
        TelegramClient::from_config(&TelegramConfig {
            api_base: base.into(),
            timeout_secs: 1,
        })
        .expect("client builds")
    }

    #[test]
    fn method_url_embeds_token_and_method() {
        let c = client("https://api.telegram.org/");
        assert_eq!(
            c.method_url("123:abc", "sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[tokio::test]
    async fn blank_token_is_invalid_without_network() {
        let c = client("http://127.0.0.1:9");
        assert!(!c.validate_token("   ").await.valid);
        assert!(!c.validate_token("12/../x").await.valid);
    }

    #[tokio::test]
    async fn unreachable_api_is_invalid_not_error() {
        // Port 9 (discard) is closed on test hosts; connection is refused.
        let c = client("http://127.0.0.1:9");
        let validation = c.validate_token("123:abc").await;
        assert!(!validation.valid);
        assert!(validation.identity.is_none());
    }
}
