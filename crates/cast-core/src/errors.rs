//! Cross-cutting error types for tgcast.
//!
//! Domain-specific errors (e.g., `StoreError`, `TelegramError`) are defined in
//! their respective crates. The binary converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised while building domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A required input field was absent or empty after trimming.
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// A field was present but its value is unusable.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// ID generation could not obtain randomness.
    #[error("ID generation failed: {0}")]
    IdGeneration(String),
}
