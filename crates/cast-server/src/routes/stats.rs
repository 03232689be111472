//! Aggregate counters and one-off token checks.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use cast_core::identity::Validation;
use cast_core::responses::Stats;
use cast_telegram::Messenger;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes<M: Messenger>() -> Router<AppState<M>> {
    Router::new()
        .route("/api/stats", get(stats::<M>))
        .route("/api/validate", post(validate::<M>))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub token: String,
}

async fn stats<M: Messenger>(State(state): State<AppState<M>>) -> Json<Stats> {
    Json(state.manager.stats().await)
}

async fn validate<M: Messenger>(
    State(state): State<AppState<M>>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> ApiResult<Json<Validation>> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if request.token.trim().is_empty() {
        return Err(ApiError::BadRequest {
            code: "MISSING_FIELD",
            message: "Missing required field: token".into(),
        });
    }
    Ok(Json(state.manager.validate(&request.token).await))
}
