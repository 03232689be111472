//! Scripted messenger and fixtures for engine tests.

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::Utc;
use tokio::time::Instant;

use cast_core::entities::{Payload, Task};
use cast_core::identity::{BotIdentity, Validation};
use cast_telegram::{Messenger, Outgoing, TelegramError};

/// Accepts a fixed set of tokens and records every call.
pub struct MockMessenger {
    valid: HashSet<String>,
    started_at: Instant,
    rate_limit: Mutex<Option<u64>>,
    sends: Mutex<Vec<(String, String, Instant)>>,
}

impl MockMessenger {
    pub fn accepting(tokens: &[&str]) -> Self {
        Self {
            valid: tokens.iter().map(ToString::to_string).collect(),
            started_at: Instant::now(),
            rate_limit: Mutex::new(None),
            sends: Mutex::new(Vec::new()),
        }
    }

    /// Answer the next send with a 429 carrying `retry_after_secs`.
    pub fn rate_limit_next(&self, retry_after_secs: u64) {
        *self.rate_limit.lock().unwrap() = Some(retry_after_secs);
    }

    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// `(chat_id, token)` for every send attempt, in order.
    pub fn sent_pairs(&self) -> Vec<(String, String)> {
        self.sends
            .lock()
            .unwrap()
            .iter()
            .map(|(chat, token, _)| (chat.clone(), token.clone()))
            .collect()
    }

    pub fn send_times(&self) -> Vec<Instant> {
        self.sends.lock().unwrap().iter().map(|(_, _, at)| *at).collect()
    }
}

impl Messenger for MockMessenger {
    async fn validate(&self, token: &str) -> Validation {
        if self.valid.contains(token) {
            Validation::valid(BotIdentity {
                id: 1,
                username: format!("{token}_bot"),
                first_name: token.to_string(),
            })
        } else {
            Validation::invalid()
        }
    }

    async fn send(
        &self,
        token: &str,
        chat_id: &str,
        _message: &Outgoing,
    ) -> Result<(), TelegramError> {
        self.sends
            .lock()
            .unwrap()
            .push((chat_id.to_string(), token.to_string(), Instant::now()));
        if let Some(retry_after_secs) = self.rate_limit.lock().unwrap().take() {
            return Err(TelegramError::RateLimited { retry_after_secs });
        }
        if self.valid.contains(token) {
            Ok(())
        } else {
            Err(TelegramError::Api {
                status: 401,
                description: "Unauthorized".into(),
            })
        }
    }

    async fn send_typing(&self, _token: &str, _chat_id: &str) -> Result<(), TelegramError> {
        Ok(())
    }
}

pub fn sample_task(tokens: &[&str], chat_ids: &[&str], delay: f64) -> Task {
    Task {
        id: "task_1_00000000".into(),
        name: "Task".into(),
        tokens: tokens.iter().map(ToString::to_string).collect(),
        invalid_tokens: Vec::new(),
        chat_ids: chat_ids.iter().map(ToString::to_string).collect(),
        payload: Payload {
            message: "hi".into(),
            photo: None,
        },
        delay,
        typing: false,
        running: true,
        sent_count: 0,
        last_sent: None,
        created_at: Utc::now(),
    }
}
