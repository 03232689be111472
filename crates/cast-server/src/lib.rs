//! # cast-server
//!
//! HTTP front end for tgcast: a JSON API over the task manager and the
//! polling dashboard served at `/`.
//!
//! [`run`] wires the whole process together from a [`CastConfig`]: it opens
//! the store, resumes persisted workers, serves until Ctrl-C or SIGTERM, and
//! then stops every worker.

pub mod error;
pub mod router;
pub mod routes;
pub mod state;

use std::sync::Arc;

use tokio::net::TcpListener;

use cast_config::CastConfig;
use cast_engine::TaskManager;
use cast_store::TaskStore;
use cast_store::error::StoreError;
use cast_telegram::{TelegramClient, TelegramError};

pub use error::{ApiError, ApiResult};
pub use router::router;
pub use state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to open task store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build Bot API client: {0}")]
    Client(#[from] TelegramError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[source] std::io::Error),
}

/// Run the server process until a shutdown signal arrives.
///
/// # Errors
///
/// Returns `ServeError` if the store cannot be opened, the listener cannot
/// bind, or the server fails while running.
pub async fn run(config: &CastConfig) -> Result<(), ServeError> {
    let store = Arc::new(TaskStore::open(config.store.path_buf()).await?);
    let client = Arc::new(TelegramClient::from_config(&config.telegram)?);
    let manager = Arc::new(TaskManager::new(store, client, config.dispatch.clone()));
    manager.resume_running().await;

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;

    let state = AppState::new(Arc::clone(&manager), &config.server.upload_dir);
    let result = serve(listener, router(state, &config.server)).await;
    manager.shutdown().await;
    result
}

/// Serve `app` on `listener` until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns `ServeError::Io` if the server loop fails.
pub async fn serve(listener: TcpListener, app: axum::Router) -> Result<(), ServeError> {
    match listener.local_addr() {
        Ok(addr) => tracing::info!(%addr, "tgcast listening"),
        Err(error) => tracing::warn!(%error, "listening on unknown address"),
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Io)
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received; stopping workers");
}

