//! Response types returned as JSON by the HTTP API and the `tgcast` CLI.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Task;

/// Result of creating or (re)starting a task.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskSummary {
    pub id: String,
    pub name: String,
    pub valid_credentials: usize,
    pub invalid_credentials: usize,
    pub running: bool,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            valid_credentials: task.tokens.len(),
            invalid_credentials: task.invalid_tokens.len(),
            running: task.running,
        }
    }
}

/// A task as shown to operators: tokens are masked.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TaskView {
    pub id: String,
    pub name: String,
    pub tokens: Vec<String>,
    pub invalid_tokens: Vec<String>,
    pub token_count: usize,
    pub invalid_token_count: usize,
    pub chat_ids: Vec<String>,
    pub message: String,
    pub photo: Option<String>,
    pub delay: f64,
    pub typing: bool,
    pub running: bool,
    pub sent_count: u64,
    pub last_sent: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            tokens: task.tokens.iter().map(|t| mask_token(t)).collect(),
            invalid_tokens: task.invalid_tokens.iter().map(|t| mask_token(t)).collect(),
            token_count: task.tokens.len(),
            invalid_token_count: task.invalid_tokens.len(),
            chat_ids: task.chat_ids.clone(),
            message: task.payload.message.clone(),
            photo: task.payload.photo.clone(),
            delay: task.delay,
            typing: task.typing,
            running: task.running,
            sent_count: task.sent_count,
            last_sent: task.last_sent,
            created_at: task.created_at,
        }
    }
}

/// Aggregate counters over every stored task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Stats {
    pub total_tasks: usize,
    pub running_tasks: usize,
    /// Distinct tokens across all tasks.
    pub total_credentials: usize,
    pub total_sent: u64,
}

impl Stats {
    #[must_use]
    pub fn collect<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut stats = Self::default();
        let mut tokens: HashSet<&str> = HashSet::new();
        for task in tasks {
            stats.total_tasks += 1;
            if task.running {
                stats.running_tasks += 1;
            }
            stats.total_sent += task.sent_count;
            tokens.extend(task.tokens.iter().map(String::as_str));
        }
        stats.total_credentials = tokens.len();
        stats
    }
}

/// Hide the secret half of a bot token.
///
/// Bot tokens look like `<bot id>:<secret>`; only the bot id is kept.
/// Anything else keeps at most its first four characters.
#[must_use]
pub fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{bot_id}:…"),
        None => {
            let head: String = token.chars().take(4).collect();
            format!("{head}…")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Payload;
    use pretty_assertions::assert_eq;

    fn task(id: &str, tokens: &[&str], running: bool, sent: u64) -> Task {
        Task {
            id: id.into(),
            name: "Task".into(),
            tokens: tokens.iter().map(|t| (*t).to_string()).collect(),
            invalid_tokens: vec!["bad".into()],
            chat_ids: vec!["1".into()],
            payload: Payload {
                message: "m".into(),
                photo: None,
            },
            delay: 1.0,
            typing: false,
            running,
            sent_count: sent,
            last_sent: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn stats_counts_distinct_tokens() {
        let tasks = [
            task("a", &["1:x", "2:y"], true, 3),
            task("b", &["2:y", "2:y"], false, 4),
        ];
        let stats = Stats::collect(&tasks);
        assert_eq!(
            stats,
            Stats {
                total_tasks: 2,
                running_tasks: 1,
                total_credentials: 2,
                total_sent: 7,
            }
        );
    }

    #[test]
    fn stats_of_nothing_is_zero() {
        assert_eq!(Stats::collect(std::iter::empty()), Stats::default());
    }

    #[test]
    fn view_masks_tokens() {
        let view = TaskView::from(&task("a", &["123456:SECRET"], true, 0));
        assert_eq!(view.tokens, vec!["123456:…"]);
        assert_eq!(view.invalid_tokens, vec!["bad…"]);
        assert_eq!(view.token_count, 1);
        assert_eq!(view.invalid_token_count, 1);
    }

    #[test]
    fn summary_reports_counts() {
        let summary = TaskSummary::from(&task("a", &["1:x", "2:y"], true, 0));
        assert_eq!(summary.valid_credentials, 2);
        assert_eq!(summary.invalid_credentials, 1);
        assert!(summary.running);
    }

    #[test]
    fn mask_short_token() {
        assert_eq!(mask_token("ab"), "ab…");
        assert_eq!(mask_token(""), "…");
    }
}
