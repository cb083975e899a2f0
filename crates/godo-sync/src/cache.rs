//! Shared in-memory snapshot.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use godo_core::{Forest, Snapshot};

/// The last reconciled forest behind a reader/writer lock.
///
/// Readers get copies; no reference into the cache outlives a call.
#[derive(Debug, Default)]
pub struct SyncCache {
    inner: RwLock<Snapshot>,
}

impl SyncCache {
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(snapshot),
        }
    }

    /// Seed from a forest loaded off disk. `last_sync` starts unset.
    #[must_use]
    pub fn from_forest(tasks: Forest) -> Self {
        Self::new(Snapshot::new(tasks, None))
    }

    #[must_use]
    pub fn read(&self) -> Snapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last_sync
    }

    /// Whether the cached forest equals `candidate`, without copying it.
    #[must_use]
    pub fn matches(&self, candidate: &[godo_core::Task]) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tasks
            == candidate
    }

    pub fn replace(&self, snapshot: Snapshot) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use godo_core::Task;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_are_copies() {
        let cache = SyncCache::from_forest(vec![Task::list("L1", "Inbox")]);
        let mut copy = cache.read();
        copy.tasks[0].title = "changed".into();

        assert_eq!(cache.read().tasks[0].title, "Inbox");
        assert!(cache.last_sync().is_none());
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let cache = SyncCache::default();
        let now = Utc::now();
        cache.replace(Snapshot::new(vec![Task::list("L1", "Inbox")], Some(now)));

        assert_eq!(cache.last_sync(), Some(now));
        assert!(cache.matches(&[Task::list("L1", "Inbox")]));
        assert!(!cache.matches(&[]));
    }
}
