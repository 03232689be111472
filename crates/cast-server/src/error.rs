//! API error type and the JSON error payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use cast_engine::CreateError;

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false`; lets the UI treat success and failure uniformly.
    pub success: bool,
    pub error: String,
    /// Stable machine-readable code.
    pub code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or incomplete request.
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    /// Well-formed request that cannot be honoured.
    #[error("{message}")]
    Unprocessable { code: &'static str, message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: "BAD_REQUEST",
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest { code, .. } => (StatusCode::BAD_REQUEST, *code),
            Self::Unprocessable { code, .. } => (StatusCode::UNPROCESSABLE_ENTITY, *code),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Timeout => (StatusCode::SERVICE_UNAVAILABLE, "TIMEOUT"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl From<CreateError> for ApiError {
    fn from(error: CreateError) -> Self {
        let message = error.to_string();
        match error {
            CreateError::MissingField { .. } => Self::BadRequest {
                code: "MISSING_FIELD",
                message,
            },
            CreateError::InvalidField { .. } => Self::BadRequest {
                code: "INVALID_FIELD",
                message,
            },
            CreateError::NoValidCredentials { .. } => Self::Unprocessable {
                code: "NO_VALID_CREDENTIALS",
                message,
            },
            CreateError::Internal(_) => Self::Internal { message },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        }
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
