//! Task ID generation.
//!
//! IDs look like `task_1718000000_a3f8b2c1`: the creation timestamp in unix
//! seconds plus four random bytes in hex, so two tasks created within the
//! same second do not collide.

use chrono::{DateTime, Utc};

use crate::errors::CoreError;

pub const PREFIX_TASK: &str = "task";

/// Build a task id for a task created at `now`.
///
/// # Errors
///
/// Returns `CoreError::IdGeneration` if the OS random source is unavailable.
pub fn task_id(now: DateTime<Utc>) -> Result<String, CoreError> {
    let mut suffix = [0u8; 4];
    getrandom::fill(&mut suffix).map_err(|e| CoreError::IdGeneration(e.to_string()))?;
    let hex: String = suffix.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{PREFIX_TASK}_{}_{hex}", now.timestamp()))
}
