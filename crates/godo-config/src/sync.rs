//! Background reconciliation settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default polling interval in seconds.
const fn default_interval_secs() -> u64 {
    30
}

/// Default observer channel capacity.
const fn default_notify_buffer() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Seconds between background reconciliations.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Pending change notifications kept before new ones are dropped.
    #[serde(default = "default_notify_buffer")]
    pub notify_buffer: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            notify_buffer: default_notify_buffer(),
        }
    }
}

impl SyncConfig {
    /// Polling interval, clamped to at least one second.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    /// Observer capacity, clamped to at least one slot.
    #[must_use]
    pub fn notify_capacity(&self) -> usize {
        self.notify_buffer.max(1)
    }
}
