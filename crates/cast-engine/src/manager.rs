//! Task lifecycle: create, start, stop, delete, and the worker registry.
//!
//! The registry holds at most one [`Worker`] per task id. A task's stored
//! `running` flag is true exactly while its worker is registered; every
//! method here keeps the two in step. Lifecycle changes are serialized on one
//! lock, so a `start` racing a `delete` can never register a worker for a
//! task that is about to disappear.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use cast_config::DispatchConfig;
use cast_core::entities::Task;
use cast_core::identity::Validation;
use cast_core::ids;
use cast_core::input::NewTask;
use cast_core::responses::{Stats, TaskSummary, TaskView};
use cast_store::TaskStore;
use cast_telegram::Messenger;

use crate::dispatch::{self, DispatchJob};
use crate::error::CreateError;

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the running workers and mediates every change to task state.
pub struct TaskManager<M: Messenger> {
    store: Arc<TaskStore>,
    messenger: Arc<M>,
    config: DispatchConfig,
    workers: Mutex<HashMap<String, Worker>>,
    /// Held across every create/start/stop/delete, including the stop grace wait.
    lifecycle: Mutex<()>,
}

impl<M: Messenger> TaskManager<M> {
    pub fn new(store: Arc<TaskStore>, messenger: Arc<M>, config: DispatchConfig) -> Self {
        Self {
            store,
            messenger,
            config,
            workers: Mutex::new(HashMap::new()),
            lifecycle: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    /// Check one token against the messaging backend.
    pub async fn validate(&self, token: &str) -> Validation {
        self.messenger.validate(token.trim()).await
    }

    /// Validate, store and start a new task.
    ///
    /// Tokens are checked concurrently. Only the valid ones are dispatched
    /// from; the rest are kept for display.
    ///
    /// # Errors
    ///
    /// `MissingField`/`InvalidField` for bad input, `NoValidCredentials` if
    /// every token is rejected, `Internal` if no id can be generated. Nothing
    /// is stored on error.
    pub async fn create(&self, request: &NewTask) -> Result<TaskSummary, CreateError> {
        let parsed = request.parse(self.config.default_delay_secs)?;

        let checks = join_all(parsed.tokens.iter().map(|t| self.messenger.validate(t))).await;
        let checked = parsed.tokens.len();
        let (valid, invalid): (Vec<_>, Vec<_>) = parsed
            .tokens
            .into_iter()
            .zip(checks)
            .partition(|(_, check)| check.valid);
        if valid.is_empty() {
            tracing::info!(checked, "rejected task: no valid tokens");
            return Err(CreateError::NoValidCredentials { checked });
        }

        let now = Utc::now();
        let task = Task {
            id: ids::task_id(now)?,
            name: parsed.name,
            tokens: valid.into_iter().map(|(token, _)| token).collect(),
            invalid_tokens: invalid.into_iter().map(|(token, _)| token).collect(),
            chat_ids: parsed.chat_ids,
            payload: parsed.payload,
            delay: parsed.delay,
            typing: parsed.typing,
            running: true,
            sent_count: 0,
            last_sent: None,
            created_at: now,
        };
        let summary = TaskSummary::from(&task);

        let _lifecycle = self.lifecycle.lock().await;
        self.store.insert(task.clone()).await;
        self.spawn_worker(&task).await;
        tracing::info!(
            task_id = %task.id,
            valid = summary.valid_credentials,
            invalid = summary.invalid_credentials,
            "task created"
        );
        Ok(summary)
    }

    /// Stop a task's worker and clear its `running` flag.
    ///
    /// Waits up to `stop_grace` for the worker to exit, then aborts it.
    /// Unknown or already stopped ids are a no-op.
    pub async fn stop(&self, id: &str) {
        let _lifecycle = self.lifecycle.lock().await;
        self.stop_locked(id).await;
    }

    async fn stop_locked(&self, id: &str) {
        let worker = self.workers.lock().await.remove(id);
        if let Some(worker) = &worker {
            worker.cancel.cancel();
        }
        if self.store.set_running(id, false).await {
            tracing::info!(task_id = id, "task stopped");
        }
        if let Some(worker) = worker {
            self.join(id, worker).await;
        }
    }

    /// (Re)start a stored task with a fresh worker.
    ///
    /// Returns `None` if the task does not exist.
    pub async fn start(&self, id: &str) -> Option<TaskSummary> {
        let _lifecycle = self.lifecycle.lock().await;
        self.store.get(id).await?;
        self.stop_locked(id).await;

        let task = self
            .store
            .update(id, |task| {
                task.running = true;
                task.clone()
            })
            .await?;
        self.spawn_worker(&task).await;
        tracing::info!(task_id = id, "task started");
        Some(TaskSummary::from(&task))
    }

    /// Stop and remove a task. Unknown ids are a no-op.
    pub async fn delete(&self, id: &str) {
        let _lifecycle = self.lifecycle.lock().await;
        self.stop_locked(id).await;
        if self.store.remove(id).await.is_some() {
            tracing::info!(task_id = id, "task deleted");
        }
    }

    /// Every task, oldest first, with tokens masked.
    pub async fn list(&self) -> Vec<TaskView> {
        self.store.list().await.iter().map(TaskView::from).collect()
    }

    pub async fn get(&self, id: &str) -> Option<TaskView> {
        self.store.get(id).await.as_ref().map(TaskView::from)
    }

    pub async fn stats(&self) -> Stats {
        self.store.stats().await
    }

    /// Give every task persisted as running a worker again.
    ///
    /// With `resume_on_start` off, those tasks are marked stopped instead.
    /// Returns how many workers were started.
    pub async fn resume_running(&self) -> usize {
        let _lifecycle = self.lifecycle.lock().await;
        let ids = self.store.running_ids().await;
        if !self.config.resume_on_start {
            for id in &ids {
                self.store.set_running(id, false).await;
            }
            if !ids.is_empty() {
                tracing::info!(count = ids.len(), "marked persisted tasks as stopped");
            }
            return 0;
        }

        let mut resumed = 0;
        for id in &ids {
            if let Some(task) = self.store.get(id).await {
                self.spawn_worker(&task).await;
                resumed += 1;
            }
        }
        if resumed > 0 {
            tracing::info!(count = resumed, "resumed running tasks");
        }
        resumed
    }

    /// Stop every worker without touching the stored `running` flags, so the
    /// next process resumes them.
    pub async fn shutdown(&self) {
        let _lifecycle = self.lifecycle.lock().await;
        let workers: Vec<(String, Worker)> = self.workers.lock().await.drain().collect();
        for (_, worker) in &workers {
            worker.cancel.cancel();
        }
        let count = workers.len();
        for (id, worker) in workers {
            self.join(&id, worker).await;
        }
        self.store.flush().await;
        tracing::info!(count, "all workers stopped");
    }

    /// Whether `id` has a live, un-cancelled worker.
    pub async fn is_active(&self, id: &str) -> bool {
        self.workers
            .lock()
            .await
            .get(id)
            .is_some_and(|w| !w.cancel.is_cancelled())
    }

    pub async fn active_workers(&self) -> usize {
        self.workers.lock().await.len()
    }

    async fn spawn_worker(&self, task: &Task) {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(dispatch::run(
            DispatchJob::from_task(task, self.config.default_delay()),
            Arc::clone(&self.store),
            Arc::clone(&self.messenger),
            self.config.pause(),
            cancel.clone(),
        ));

        let replaced = self
            .workers
            .lock()
            .await
            .insert(task.id.clone(), Worker { cancel, handle });
        if let Some(old) = replaced {
            tracing::warn!(task_id = %task.id, "replacing a worker that was still registered");
            old.cancel.cancel();
            old.handle.abort();
        }
    }

    #[cfg(test)]
    async fn worker_token(&self, id: &str) -> Option<CancellationToken> {
        self.workers.lock().await.get(id).map(|w| w.cancel.clone())
    }

    async fn join(&self, id: &str, worker: Worker) {
        let Worker { mut handle, .. } = worker;
        match tokio::time::timeout(self.config.stop_grace(), &mut handle).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) if error.is_panic() => {
                tracing::error!(task_id = id, %error, "dispatch worker panicked");
            }
            Ok(Err(_)) => {}
            Err(_) => {
                tracing::warn!(task_id = id, "worker did not exit in time; aborting");
                handle.abort();
            }
        }
    }
}
