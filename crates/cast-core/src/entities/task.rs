use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::PhotoSource;

/// What a task delivers on every send.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Payload {
    pub message: String,
    /// Photo URL or local file path; the message becomes the caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Payload {
    #[must_use]
    pub fn photo_source(&self) -> PhotoSource {
        PhotoSource::classify(self.photo.as_deref())
    }
}

/// One dispatch job: send `payload` from every token to every chat id, every
/// `delay` seconds, until stopped.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Tokens that passed validation, in submission order. Duplicates allowed.
    pub tokens: Vec<String>,
    /// Tokens rejected at creation time, kept for display only.
    #[serde(default)]
    pub invalid_tokens: Vec<String>,
    pub chat_ids: Vec<String>,
    #[serde(flatten)]
    pub payload: Payload,
    /// Seconds to wait between full dispatch cycles.
    pub delay: f64,
    #[serde(default)]
    pub typing: bool,
    pub running: bool,
    #[serde(default)]
    pub sent_count: u64,
    #[serde(default)]
    pub last_sent: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Record one successful delivery.
    pub fn record_sent(&mut self, at: DateTime<Utc>) {
        self.sent_count += 1;
        self.last_sent = Some(at);
    }
}
