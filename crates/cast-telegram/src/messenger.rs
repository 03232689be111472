//! The delivery seam used by the dispatch engine.

use std::future::Future;
use std::path::PathBuf;

use cast_core::identity::Validation;

use crate::TelegramClient;
use crate::error::TelegramError;

/// One message ready to be sent to one chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Text { text: String },
    PhotoUrl { url: String, caption: String },
    PhotoUpload { path: PathBuf, caption: String },
}

impl Outgoing {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::PhotoUrl { .. } => "photo_url",
            Self::PhotoUpload { .. } => "photo_upload",
        }
    }
}

/// Everything the dispatcher needs from a messaging backend.
pub trait Messenger: Send + Sync + 'static {
    /// Check a credential. Must not fail; problems mean `valid: false`.
    fn validate(&self, token: &str) -> impl Future<Output = Validation> + Send;

    /// Deliver one message from `token` to `chat_id`.
    fn send(
        &self,
        token: &str,
        chat_id: &str,
        message: &Outgoing,
    ) -> impl Future<Output = Result<(), TelegramError>> + Send;

    /// Show the "typing…" indicator in `chat_id`.
    fn send_typing(
        &self,
        token: &str,
        chat_id: &str,
    ) -> impl Future<Output = Result<(), TelegramError>> + Send;
}

impl Messenger for TelegramClient {
    async fn validate(&self, token: &str) -> Validation {
        self.validate_token(token).await
    }

    async fn send(
        &self,
        token: &str,
        chat_id: &str,
        message: &Outgoing,
    ) -> Result<(), TelegramError> {
        match message {
            Outgoing::Text { text } => self.send_message(token, chat_id, text).await,
            Outgoing::PhotoUrl { url, caption } => {
                self.send_photo_url(token, chat_id, url, caption).await
            }
            Outgoing::PhotoUpload { path, caption } => {
                self.send_photo_upload(token, chat_id, path, caption).await
            }
        }
    }

    async fn send_typing(&self, token: &str, chat_id: &str) -> Result<(), TelegramError> {
        self.send_chat_action(token, chat_id, "typing").await
    }
}
