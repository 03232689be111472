//! # cast-store
//!
//! Task state for tgcast: an in-memory map of task id → [`Task`], mirrored to
//! a JSON file after every mutation.
//!
//! All access goes through one async mutex. Each mutating method performs its
//! read-modify-write and snapshot serialization as one critical section, then
//! releases the map before the file is written. Callers never hold the lock
//! across network calls or sleeps.
//!
//! Persistence is best effort: a failed write is logged and the in-memory
//! state stays authoritative.

pub mod error;
pub mod helpers;
pub mod snapshot;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

use cast_core::entities::Task;
use cast_core::responses::Stats;
use error::StoreError;

type TaskMap = BTreeMap<String, Task>;

/// Shared handle to all task state.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Mutex<TaskMap>,
    /// Serializes file writes so snapshots land in mutation order.
    writer: Mutex<()>,
    path: Option<PathBuf>,
}

impl TaskStore {
    /// Open the store backed by the snapshot at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if an existing snapshot cannot be read or
    /// moved aside. Unreadable contents are not an error; see
    /// [`snapshot::load`].
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tasks = snapshot::load(&path).await?;
        Ok(Self {
            tasks: Mutex::new(tasks),
            writer: Mutex::new(()),
            path: Some(path),
        })
    }

    /// A store that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            tasks: Mutex::new(BTreeMap::new()),
            writer: Mutex::new(()),
            path: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert or replace a task, then persist.
    pub async fn insert(&self, task: Task) {
        let mut tasks = self.tasks.lock().await;
        tasks.insert(task.id.clone(), task);
        self.persist(tasks).await;
    }

    pub async fn get(&self, id: &str) -> Option<Task> {
        self.tasks.lock().await.get(id).cloned()
    }

    /// All tasks, oldest first.
    pub async fn list(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.lock().await.values().cloned().collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        tasks
    }

    /// Ids of tasks whose `running` flag is set.
    pub async fn running_ids(&self) -> Vec<String> {
        self.tasks
            .lock()
            .await
            .values()
            .filter(|t| t.running)
            .map(|t| t.id.clone())
            .collect()
    }

    pub async fn stats(&self) -> Stats {
        Stats::collect(self.tasks.lock().await.values())
    }

    /// Set the `running` flag. Returns `false` if the task does not exist,
    /// in which case nothing is written.
    pub async fn set_running(&self, id: &str, running: bool) -> bool {
        self.update(id, |task| task.running = running).await.is_some()
    }

    /// Count one successful delivery and stamp `last_sent`, as one unit.
    ///
    /// Returns the new `sent_count`, or `None` if the task is gone.
    pub async fn record_sent(&self, id: &str, at: DateTime<Utc>) -> Option<u64> {
        self.update(id, |task| {
            task.record_sent(at);
            task.sent_count
        })
        .await
    }

    /// Apply `f` to one task under the lock and persist.
    ///
    /// Returns `None` without writing if the task does not exist.
    pub async fn update<R>(&self, id: &str, f: impl FnOnce(&mut Task) -> R) -> Option<R> {
        let mut tasks = self.tasks.lock().await;
        let result = f(tasks.get_mut(id)?);
        self.persist(tasks).await;
        Some(result)
    }

    /// Remove a task and persist. Unknown ids still rewrite the snapshot.
    pub async fn remove(&self, id: &str) -> Option<Task> {
        let mut tasks = self.tasks.lock().await;
        let removed = tasks.remove(id);
        self.persist(tasks).await;
        removed
    }

    /// Write the current state out, e.g. on shutdown.
    pub async fn flush(&self) {
        let tasks = self.tasks.lock().await;
        self.persist(tasks).await;
    }

    /// Serialize under the map lock, then write under the writer lock only.
    ///
    /// The writer lock is taken before the map lock is released so two
    /// mutations cannot reach the disk out of order.
    async fn persist(&self, tasks: MutexGuard<'_, TaskMap>) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let bytes = match snapshot::encode(&tasks) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::error!(%error, "failed to serialize task snapshot");
                return;
            }
        };
        let _writer = self.writer.lock().await;
        drop(tasks);
        if let Err(error) = snapshot::write(path, &bytes).await {
            tracing::error!(path = %path.display(), %error, "failed to write task snapshot");
        }
    }
}
