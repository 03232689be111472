//! Shared state for request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use cast_engine::TaskManager;
use cast_telegram::Messenger;

/// Cloned into every handler.
pub struct AppState<M: Messenger> {
    pub manager: Arc<TaskManager<M>>,
    /// Destination for `POST /api/upload`.
    pub upload_dir: Arc<PathBuf>,
}

impl<M: Messenger> AppState<M> {
    #[must_use]
    pub fn new(manager: Arc<TaskManager<M>>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            manager,
            upload_dir: Arc::new(upload_dir.into()),
        }
    }
}

impl<M: Messenger> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            upload_dir: Arc::clone(&self.upload_dir),
        }
    }
}
