//! Send-side Bot API methods.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde_json::json;

use crate::TelegramClient;
use crate::error::TelegramError;
use crate::http::into_result;

impl TelegramClient {
    /// `sendMessage` with plain text.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] on transport, status or parse failures,
    /// including [`TelegramError::RateLimited`] on 429.
    pub async fn send_message(
        &self,
        token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<(), TelegramError> {
        let resp = self
            .http
            .post(self.method_url(token, "sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;
        into_result::<serde_json::Value>(resp).await.map(drop)
    }

    /// `sendPhoto` referencing a remote URL, with `caption`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::send_message`].
    pub async fn send_photo_url(
        &self,
        token: &str,
        chat_id: &str,
        url: &str,
        caption: &str,
    ) -> Result<(), TelegramError> {
        let resp = self
            .http
            .post(self.method_url(token, "sendPhoto"))
            .json(&json!({ "chat_id": chat_id, "photo": url, "caption": caption }))
            .send()
            .await?;
        into_result::<serde_json::Value>(resp).await.map(drop)
    }

    /// `sendPhoto` uploading a local file as multipart form data.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Io`] if the file cannot be read, otherwise
    /// the same as [`Self::send_message`].
    pub async fn send_photo_upload(
        &self,
        token: &str,
        chat_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), TelegramError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| TelegramError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg")
            .to_string();

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", Part::bytes(bytes).file_name(file_name));

        let resp = self
            .http
            .post(self.method_url(token, "sendPhoto"))
            .multipart(form)
            .send()
            .await?;
        into_result::<serde_json::Value>(resp).await.map(drop)
    }

    /// `sendChatAction`, e.g. `"typing"`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::send_message`].
    pub async fn send_chat_action(
        &self,
        token: &str,
        chat_id: &str,
        action: &str,
    ) -> Result<(), TelegramError> {
        let resp = self
            .http
            .post(self.method_url(token, "sendChatAction"))
            .json(&json!({ "chat_id": chat_id, "action": action }))
            .send()
            .await?;
        into_result::<bool>(resp).await.map(drop)
    }
}
