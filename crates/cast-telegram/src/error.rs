//! Bot API error types.

use thiserror::Error;

/// Errors that can occur when calling the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP transport error. The request URL (which embeds the token) is
    /// stripped before the error is stored.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The API answered with a non-success status or `ok: false`.
    #[error("API error ({status}): {description}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `description` field of the response, or the raw body.
        description: String,
    },

    /// The API returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Failed to parse an API response.
    #[error("parse error: {0}")]
    Parse(String),

    /// A local photo could not be read for upload.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for TelegramError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.without_url())
    }
}

impl TelegramError {
    /// Seconds to back off, if this is a rate-limit answer.
    #[must_use]
    pub const fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}
