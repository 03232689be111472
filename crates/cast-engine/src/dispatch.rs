//! The per-task dispatch worker.
//!
//! A worker walks `chat_ids × tokens` in list order, sends one message per
//! pair, then sleeps for the task's delay and starts over. It stops when its
//! cancellation token fires or when a delivery finds the task no longer
//! stored. Every sleep races the token, so a stop never waits longer than one
//! in-flight Bot API call.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use cast_core::entities::{Payload, Task};
use cast_core::enums::PhotoSource;
use cast_core::responses::mask_token;
use cast_store::TaskStore;
use cast_telegram::{Messenger, Outgoing, TelegramError};

/// Probability that one typing step actually sends the indicator.
const TYPING_CHANCE: f64 = 0.7;

/// Everything a worker needs, copied out of the stored task at spawn time.
#[derive(Debug, Clone)]
pub struct DispatchJob {
    pub task_id: String,
    pub tokens: Vec<String>,
    pub chat_ids: Vec<String>,
    pub payload: Payload,
    pub delay: Duration,
    pub typing: bool,
}

impl DispatchJob {
    /// Snapshot `task` for a worker. A delay that is not a usable duration
    /// (negative, NaN, overflowing) is replaced by `fallback_delay`.
    #[must_use]
    pub fn from_task(task: &Task, fallback_delay: Duration) -> Self {
        let delay = Duration::try_from_secs_f64(task.delay).unwrap_or_else(|_| {
            tracing::warn!(
                task_id = %task.id,
                delay = task.delay,
                fallback_secs = fallback_delay.as_secs_f64(),
                "unusable task delay; using configured default"
            );
            fallback_delay
        });
        Self {
            task_id: task.id.clone(),
            tokens: task.tokens.clone(),
            chat_ids: task.chat_ids.clone(),
            payload: task.payload.clone(),
            delay,
            typing: task.typing,
        }
    }
}

/// Build the message for one cycle.
///
/// The photo is classified every cycle, so an upload that lands after the
/// task was created is picked up on the next pass.
#[must_use]
pub fn outgoing(payload: &Payload) -> Outgoing {
    let caption = payload.message.clone();
    match payload.photo_source() {
        PhotoSource::Url(url) => Outgoing::PhotoUrl { url, caption },
        PhotoSource::Upload(path) => Outgoing::PhotoUpload { path, caption },
        PhotoSource::None => Outgoing::Text { text: caption },
    }
}

/// Run one task until `cancel` fires.
pub async fn run<M: Messenger>(
    job: DispatchJob,
    store: Arc<TaskStore>,
    messenger: Arc<M>,
    pause: Duration,
    cancel: CancellationToken,
) {
    let task_id = job.task_id.as_str();
    tracing::info!(
        task_id,
        chats = job.chat_ids.len(),
        tokens = job.tokens.len(),
        "dispatch worker started"
    );

    'cycle: while !cancel.is_cancelled() {
        let message = outgoing(&job.payload);

        for chat_id in &job.chat_ids {
            if cancel.is_cancelled() {
                break 'cycle;
            }
            for token in &job.tokens {
                if cancel.is_cancelled() {
                    break 'cycle;
                }
                if job.typing && !simulate_typing(messenger.as_ref(), token, chat_id, &cancel).await
                {
                    break 'cycle;
                }

                match messenger.send(token, chat_id, &message).await {
                    Ok(()) => {
                        if store.record_sent(task_id, Utc::now()).await.is_none() {
                            tracing::info!(task_id, "task no longer stored; worker exiting");
                            break 'cycle;
                        }
                    }
                    Err(TelegramError::RateLimited { retry_after_secs }) => {
                        tracing::warn!(
                            task_id,
                            chat_id = chat_id.as_str(),
                            token = %mask_token(token),
                            retry_after_secs,
                            "rate limited"
                        );
                        if !sleep_or_cancel(&cancel, Duration::from_secs(retry_after_secs)).await {
                            break 'cycle;
                        }
                    }
                    Err(error) => {
                        tracing::warn!(
                            task_id,
                            chat_id = chat_id.as_str(),
                            token = %mask_token(token),
                            kind = message.kind(),
                            %error,
                            "send failed"
                        );
                    }
                }

                if !sleep_or_cancel(&cancel, pause).await {
                    break 'cycle;
                }
            }
        }

        if !sleep_or_cancel(&cancel, job.delay).await {
            break;
        }
    }

    tracing::info!(task_id, "dispatch worker stopped");
}

/// Sleep unless cancelled first. Returns `false` on cancellation.
pub async fn sleep_or_cancel(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(duration) => true,
    }
}

/// Show "typing…" for a random stretch before a send.
///
/// Indicator failures are ignored. Returns `false` if cancelled.
async fn simulate_typing<M: Messenger>(
    messenger: &M,
    token: &str,
    chat_id: &str,
    cancel: &CancellationToken,
) -> bool {
    let typing_for = Duration::from_secs_f64(rand::rng().random_range(0.5..1.5));
    let until = Instant::now() + typing_for;

    while Instant::now() < until {
        let show = rand::rng().random_bool(TYPING_CHANCE);
        if show {
            if let Err(error) = messenger.send_typing(token, chat_id).await {
                tracing::debug!(chat_id, %error, "typing indicator failed");
            }
        }
        let step = Duration::from_secs_f64(rand::rng().random_range(1.0..2.0));
        if !sleep_or_cancel(cancel, step).await {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockMessenger, sample_task};
    use pretty_assertions::assert_eq;

    fn job(task: &Task) -> DispatchJob {
        DispatchJob::from_task(task, Duration::from_secs(5))
    }

    async fn store_with(task: &Task) -> Arc<TaskStore> {
        let store = Arc::new(TaskStore::in_memory());
        store.insert(task.clone()).await;
        store
    }

    #[test]
    fn outgoing_picks_delivery_by_photo() {
        let mut payload = Payload {
            message: "hi".into(),
            photo: None,
        };
        assert_eq!(outgoing(&payload), Outgoing::Text { text: "hi".into() });

        payload.photo = Some("https://example.com/a.png".into());
        assert_eq!(
            outgoing(&payload),
            Outgoing::PhotoUrl {
                url: "https://example.com/a.png".into(),
                caption: "hi".into()
            }
        );

        let file = tempfile::NamedTempFile::new().expect("tmp file");
        payload.photo = Some(file.path().display().to_string());
        assert_eq!(
            outgoing(&payload),
            Outgoing::PhotoUpload {
                path: file.path().to_path_buf(),
                caption: "hi".into()
            }
        );

        payload.photo = Some("/definitely/not/here.png".into());
        assert_eq!(outgoing(&payload), Outgoing::Text { text: "hi".into() });
    }

    #[tokio::test(start_paused = true)]
    async fn one_cycle_visits_chats_then_tokens_in_order() {
        let task = sample_task(&["A", "B"], &["X", "Y"], 1.0);
        let store = store_with(&task).await;
        let messenger = Arc::new(MockMessenger::accepting(&["A", "B"]));
        let cancel = CancellationToken::new();

        let worker = tokio::spawn(run(
            job(&task),
            Arc::clone(&store),
            Arc::clone(&messenger),
            Duration::from_millis(100),
            cancel.clone(),
        ));
        // One cycle is four sends with 100ms pauses; stop during the delay.
        tokio::time::sleep(Duration::from_millis(700)).await;
        cancel.cancel();
        worker.await.expect("worker joins");

        assert_eq!(
            messenger.sent_pairs(),
            vec![
                ("X".to_string(), "A".to_string()),
                ("X".to_string(), "B".to_string()),
                ("Y".to_string(), "A".to_string()),
                ("Y".to_string(), "B".to_string()),
            ]
        );
        let stored = store.get(&task.id).await.expect("task");
        assert_eq!(stored.sent_count, 4);
        assert!(stored.last_sent.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_pauses_without_counting() {
        let task = sample_task(&["A", "B"], &["X"], 60.0);
        let store = store_with(&task).await;
        let messenger = Arc::new(MockMessenger::accepting(&["A", "B"]));
        messenger.rate_limit_next(3);
        let cancel = CancellationToken::new();

        let worker = tokio::spawn(run(
            job(&task),
            Arc::clone(&store),
            Arc::clone(&messenger),
            Duration::from_millis(100),
            cancel.clone(),
        ));
        tokio::time::sleep(Duration::from_secs(5)).await;
        cancel.cancel();
        worker.await.expect("worker joins");

        let times = messenger.send_times();
        assert_eq!(times.len(), 2);
        assert!(times[1] - times[0] >= Duration::from_secs(3));
        // Only B's send counts; A was rate limited.
        assert_eq!(store.get(&task.id).await.expect("task").sent_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_sleep_is_cancellable() {
        let task = sample_task(&["A"], &["X"], 1.0);
        let store = store_with(&task).await;
        let messenger = Arc::new(MockMessenger::accepting(&["A"]));
        messenger.rate_limit_next(600);
        let cancel = CancellationToken::new();

        let worker = tokio::spawn(run(
            job(&task),
            store,
            Arc::clone(&messenger),
            Duration::from_millis(100),
            cancel.clone(),
        ));
        tokio::time::sleep(Duration::from_secs(1)).await;
        let stopped_at = Instant::now();
        cancel.cancel();
        worker.await.expect("worker joins");

        assert!(Instant::now() - stopped_at < Duration::from_secs(1));
        assert_eq!(messenger.send_times().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_the_loop() {
        let task = sample_task(&["bad", "A"], &["X"], 1.0);
        let store = store_with(&task).await;
        // "bad" is rejected by the API on every send.
        let messenger = Arc::new(MockMessenger::accepting(&["A"]));
        let cancel = CancellationToken::new();

        let worker = tokio::spawn(run(
            job(&task),
            Arc::clone(&store),
            Arc::clone(&messenger),
            Duration::from_millis(100),
            cancel.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(2_450)).await;
        cancel.cancel();
        worker.await.expect("worker joins");

        let attempts = messenger.send_times().len() as u64;
        let counted = store.get(&task.id).await.expect("task").sent_count;
        assert!(attempts >= 4);
        assert_eq!(counted, attempts / 2);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_indicator_precedes_send() {
        let mut task = sample_task(&["A"], &["X"], 5.0);
        task.typing = true;
        let store = store_with(&task).await;
        let messenger = Arc::new(MockMessenger::accepting(&["A"]));
        let cancel = CancellationToken::new();

        let worker = tokio::spawn(run(
            job(&task),
            Arc::clone(&store),
            Arc::clone(&messenger),
            Duration::from_millis(100),
            cancel.clone(),
        ));
        tokio::time::sleep(Duration::from_secs(4)).await;
        cancel.cancel();
        worker.await.expect("worker joins");

        // Typing takes at least one 1–2 s step before the first send.
        let first_send = messenger.send_times()[0];
        assert!(first_send - messenger.started_at() >= Duration::from_secs(1));
    }

    #[test]
    fn unusable_delay_uses_fallback() {
        let mut task = sample_task(&["A"], &["X"], -1.0);
        assert_eq!(
            DispatchJob::from_task(&task, Duration::from_secs(7)).delay,
            Duration::from_secs(7)
        );
        task.delay = 2.5;
        assert_eq!(
            DispatchJob::from_task(&task, Duration::from_secs(7)).delay,
            Duration::from_millis(2_500)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn worker_exits_once_its_task_is_gone() {
        let task = sample_task(&["A", "B"], &["X"], 1.0);
        let store = Arc::new(TaskStore::in_memory());
        let messenger = Arc::new(MockMessenger::accepting(&["A", "B"]));
        let cancel = CancellationToken::new();

        let worker = tokio::spawn(run(
            job(&task),
            Arc::clone(&store),
            Arc::clone(&messenger),
            Duration::from_millis(100),
            cancel.clone(),
        ));
        // Never cancelled: the first delivery finds nothing to count and ends the loop.
        tokio::time::timeout(Duration::from_secs(1), worker)
            .await
            .expect("worker exits without cancellation")
            .expect("worker joins");

        assert_eq!(messenger.send_times().len(), 1);
        assert!(!cancel.is_cancelled());
    }
}
