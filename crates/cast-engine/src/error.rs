//! Task creation errors.

use thiserror::Error;

use cast_core::errors::CoreError;

/// Why a task could not be created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreateError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Every submitted token failed validation.
    #[error("No valid bot tokens ({checked} checked)")]
    NoValidCredentials { checked: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for CreateError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::MissingField { field } => Self::MissingField { field },
            CoreError::InvalidField { field, reason } => Self::InvalidField { field, reason },
            CoreError::IdGeneration(msg) => Self::Internal(msg),
        }
    }
}
