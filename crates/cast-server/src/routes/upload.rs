//! Photo upload for tasks that send a local file.

use axum::Json;
use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use serde::{Deserialize, Serialize};

use cast_telegram::Messenger;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes<M: Messenger>(max_bytes: usize) -> Router<AppState<M>> {
    Router::new()
        .route("/api/upload", post(upload::<M>))
        .layer(DefaultBodyLimit::max(max_bytes))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Uploaded {
    pub success: bool,
    /// Server-side path to put in a task's `photo` field.
    pub path: String,
}

/// `POST /api/upload`: store the multipart `file` field under the upload dir.
async fn upload<M: Messenger>(
    State(state): State<AppState<M>>,
    mut multipart: Multipart,
) -> ApiResult<Json<Uploaded>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .and_then(sanitize_file_name)
            .ok_or_else(|| ApiError::bad_request("No file selected"))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        let dir = state.upload_dir.as_path();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ApiError::internal(format!("cannot create {}: {e}", dir.display())))?;
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ApiError::internal(format!("cannot write {}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "photo uploaded");
        return Ok(Json(Uploaded {
            success: true,
            path: path.display().to_string(),
        }));
    }
    Err(ApiError::BadRequest {
        code: "MISSING_FIELD",
        message: "Missing required field: file".into(),
    })
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Directory parts are dropped, whitespace becomes `_`, and anything outside
/// `[A-Za-z0-9._-]` is removed. Returns `None` if nothing usable is left.
#[must_use]
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}
