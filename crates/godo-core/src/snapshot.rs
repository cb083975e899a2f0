//! Snapshots: a forest plus the time it was fetched.

use chrono::{DateTime, Utc};

use crate::entities::Task;

/// One task-list container per list, each owning its task trees.
pub type Forest = Vec<Task>;

/// The complete forest plus its fetch timestamp, replaced as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub tasks: Forest,
    /// `None` until a reconciliation has replaced this snapshot.
    pub last_sync: Option<DateTime<Utc>>,
}

impl Snapshot {
    #[must_use]
    pub const fn new(tasks: Forest, last_sync: Option<DateTime<Utc>>) -> Self {
        Self { tasks, last_sync }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Total number of tasks across all lists, excluding the list containers.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.iter().map(Task::descendant_count).sum()
    }
}
