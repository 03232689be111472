//! Dispatch loop tuning.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pause between two credential attempts.
const fn default_pause_ms() -> u64 {
    100
}

/// How long `stop` waits for a worker before aborting it.
const fn default_stop_grace_ms() -> u64 {
    2_000
}

const fn default_resume_on_start() -> bool {
    true
}

const fn default_delay_secs() -> f64 {
    5.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    #[serde(default = "default_stop_grace_ms")]
    pub stop_grace_ms: u64,

    /// Restart workers for tasks persisted as running.
    #[serde(default = "default_resume_on_start")]
    pub resume_on_start: bool,

    /// Cycle delay used when a creation request omits one.
    #[serde(default = "default_delay_secs")]
    pub default_delay_secs: f64,
}

impl DispatchConfig {
    #[must_use]
    pub const fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    #[must_use]
    pub const fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }

    /// `default_delay_secs` as a duration, for tasks whose own delay is unusable.
    #[must_use]
    pub fn default_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.default_delay_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_delay_secs()))
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pause_ms: default_pause_ms(),
            stop_grace_ms: default_stop_grace_ms(),
            resume_on_start: default_resume_on_start(),
            default_delay_secs: default_delay_secs(),
        }
    }
}
