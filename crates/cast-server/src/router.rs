//! Router assembly.

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::OriginalUri;
use axum::routing::get;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use cast_config::ServerConfig;
use cast_telegram::Messenger;

use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;

/// Build the full application router.
pub fn router<M: Messenger>(state: AppState<M>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(routes::ui::index))
        .merge(routes::tasks::routes())
        .merge(routes::stats::routes())
        .merge(routes::upload::routes(config.max_upload_bytes))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(TimeoutLayer::new(config.request_timeout())),
        )
        .with_state(state)
}

async fn not_found(uri: OriginalUri) -> ApiError {
    ApiError::NotFound {
        message: format!("not found: {}", uri.0.path()),
    }
}

async fn handle_timeout_error(_err: tower::BoxError) -> ApiError {
    ApiError::Timeout
}
