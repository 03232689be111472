//! Task creation input.
//!
//! Forms and the CLI submit tokens and chat ids as comma-separated strings.
//! [`NewTask::parse`] turns that into validated lists before any network call
//! is made.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::Payload;
use crate::errors::CoreError;

pub const DEFAULT_TASK_NAME: &str = "Task";

/// Raw creation request, as submitted by the web form or CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewTask {
    #[serde(default)]
    pub name: Option<String>,
    /// Comma-separated bot tokens.
    #[serde(default)]
    pub tokens: String,
    /// Comma-separated destination chat ids.
    #[serde(default)]
    pub chat_ids: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Seconds between cycles. HTML forms post this as a string.
    #[serde(default, deserialize_with = "lenient_f64")]
    #[schemars(with = "Option<f64>")]
    pub delay: Option<f64>,
    /// HTML checkboxes post `"on"`.
    #[serde(default, deserialize_with = "lenient_bool")]
    #[schemars(with = "bool")]
    pub typing: bool,
}

/// A creation request that passed local validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTask {
    pub name: String,
    pub tokens: Vec<String>,
    pub chat_ids: Vec<String>,
    pub payload: Payload,
    pub delay: f64,
    pub typing: bool,
}

impl NewTask {
    /// Split and check the request.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingField` when tokens, chat ids or the message
    /// are empty, and `CoreError::InvalidField` when the delay is not a
    /// positive finite number.
    pub fn parse(&self, default_delay: f64) -> Result<ParsedTask, CoreError> {
        let tokens = split_list(&self.tokens);
        if tokens.is_empty() {
            return Err(CoreError::MissingField { field: "tokens" });
        }
        let chat_ids = split_list(&self.chat_ids);
        if chat_ids.is_empty() {
            return Err(CoreError::MissingField { field: "chat_ids" });
        }
        if self.message.trim().is_empty() {
            return Err(CoreError::MissingField { field: "message" });
        }

        let delay = self.delay.unwrap_or(default_delay);
        if !delay.is_finite() || delay <= 0.0 {
            return Err(CoreError::InvalidField {
                field: "delay",
                reason: format!("must be a positive number of seconds, got {delay}"),
            });
        }

        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_TASK_NAME)
            .to_string();

        let photo = self
            .photo
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from);

        Ok(ParsedTask {
            name,
            tokens,
            chat_ids,
            payload: Payload {
                message: self.message.clone(),
                photo,
            },
            delay,
            typing: self.typing,
        })
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks.
///
/// Order and duplicates are preserved.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrText {
    Bool(bool),
    Text(String),
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<BoolOrText>::deserialize(deserializer)? {
        None => false,
        Some(BoolOrText::Bool(b)) => b,
        Some(BoolOrText::Text(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "on" | "true" | "1" | "yes"
        ),
    })
}
