//! Record-to-entity parsing helpers.
//!
//! Snapshots written by tgcast deserialize straight into [`Task`]. Files left
//! behind by the earlier script-based dispatcher use the same field names but
//! store timestamps as local `"%Y-%m-%d %H:%M:%S"` strings and an empty
//! string for "never sent". These helpers accept both.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use cast_core::entities::{Payload, Task};
use cast_core::input::DEFAULT_TASK_NAME;

use crate::error::StoreError;

/// Parse a timestamp as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and the legacy
/// format (`"2026-02-09 14:30:00"`, read as UTC).
///
/// # Errors
///
/// Returns `StoreError::InvalidRecord` if the string matches neither format.
pub fn parse_datetime(id: &str, s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::InvalidRecord {
            id: id.to_string(),
            reason: format!("bad timestamp '{s}': {e}"),
        })
}

/// Parse an optional timestamp; `None` and `""` both mean "never".
///
/// # Errors
///
/// Returns `StoreError::InvalidRecord` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(
    id: &str,
    s: Option<&str>,
) -> Result<Option<DateTime<Utc>>, StoreError> {
    match s {
        Some(s) if !s.trim().is_empty() => Ok(Some(parse_datetime(id, s)?)),
        _ => Ok(None),
    }
}

#[derive(Deserialize)]
struct LegacyTask {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tokens: Vec<String>,
    #[serde(default)]
    chat_ids: Vec<String>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    photo: Option<String>,
    #[serde(default)]
    delay: Option<f64>,
    #[serde(default)]
    typing: bool,
    #[serde(default)]
    running: bool,
    #[serde(default)]
    sent_count: u64,
    #[serde(default)]
    last_sent: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

/// Interpret one snapshot record.
///
/// # Errors
///
/// Returns `StoreError::InvalidRecord` if the value is neither a current nor
/// a legacy task record.
pub fn task_from_value(id: &str, value: serde_json::Value) -> Result<Task, StoreError> {
    let current_err = match serde_json::from_value::<Task>(value.clone()) {
        Ok(mut task) => {
            task.id = id.to_string();
            return Ok(task);
        }
        Err(e) => e,
    };

    let legacy: LegacyTask =
        serde_json::from_value(value).map_err(|_| StoreError::InvalidRecord {
            id: id.to_string(),
            reason: current_err.to_string(),
        })?;

    if legacy.tokens.is_empty() || legacy.chat_ids.is_empty() {
        return Err(StoreError::InvalidRecord {
            id: id.to_string(),
            reason: "record has no tokens or no chat ids".into(),
        });
    }

    let created_at = match legacy.created_at.as_deref() {
        Some(s) if !s.trim().is_empty() => parse_datetime(id, s)?,
        _ => Utc::now(),
    };

    Ok(Task {
        id: id.to_string(),
        name: legacy
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TASK_NAME.to_string()),
        tokens: legacy.tokens,
        invalid_tokens: Vec::new(),
        chat_ids: legacy.chat_ids,
        payload: Payload {
            message: legacy.message,
            photo: legacy.photo.filter(|p| !p.trim().is_empty()),
        },
        delay: legacy.delay.filter(|d| d.is_finite() && *d > 0.0).unwrap_or(5.0),
        typing: legacy.typing,
        running: legacy.running,
        sent_count: legacy.sent_count,
        last_sent: parse_optional_datetime(id, legacy.last_sent.as_deref())?,
        created_at,
    })
}
