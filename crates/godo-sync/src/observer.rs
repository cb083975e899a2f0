//! Change notifications for a presentation layer.
//!
//! Delivery is best-effort: the publisher never waits, and a notification
//! that finds the buffer full is dropped. A consumer that falls behind still
//! sees at least one pending event and should re-read the cache.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::TrySendError};

/// The cached forest was replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksChanged {
    pub task_count: usize,
    pub last_sync: DateTime<Utc>,
}

/// Bounded observer channel. `capacity` is clamped to at least 1.
#[must_use]
pub fn channel(capacity: usize) -> (ChangePublisher, ChangeReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChangePublisher { tx }, ChangeReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct ChangePublisher {
    tx: mpsc::Sender<TasksChanged>,
}

impl ChangePublisher {
    /// Returns whether the event was queued.
    pub fn publish(&self, event: TasksChanged) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::debug!("observer buffer full; dropping change notification");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

#[derive(Debug)]
pub struct ChangeReceiver {
    rx: mpsc::Receiver<TasksChanged>,
}

impl ChangeReceiver {
    /// Wait for the next change. `None` once every publisher is gone.
    pub async fn recv(&mut self) -> Option<TasksChanged> {
        self.rx.recv().await
    }

    /// Next pending change, if any.
    pub fn try_recv(&mut self) -> Option<TasksChanged> {
        self.rx.try_recv().ok()
    }
}
