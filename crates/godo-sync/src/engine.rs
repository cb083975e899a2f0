//! Remote → cache reconciliation.
//!
//! One pass fetches every list and its tasks, rebuilds each list's tree and
//! compares the candidate forest with the cache. Equal forests are a no-op;
//! anything else replaces the cache wholesale, persists it and publishes one
//! [`TasksChanged`].

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use godo_core::{Forest, Snapshot, Task, build_forest};
use godo_remote::{RemoteError, TaskRemote};
use godo_store::SnapshotStore;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;

use crate::cache::SyncCache;
use crate::observer::{ChangePublisher, TasksChanged};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Fetching,
    Reconciling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing was compared: local-only mode, cancellation, or the remote
    /// could not list its task lists.
    Skipped,
    /// The remote matches the cache. Nothing was written or published.
    Unchanged,
    /// The cache was replaced and one notification published.
    Replaced,
}

/// A fetched forest plus the ids of lists whose contents could not be
/// fetched or assembled.
#[derive(Debug, Default)]
pub struct Candidate {
    pub forest: Forest,
    pub skipped: HashSet<String>,
}

pub struct SyncEngine {
    remote: Option<Arc<dyn TaskRemote>>,
    cache: Arc<SyncCache>,
    store: SnapshotStore,
    publisher: ChangePublisher,
    state: watch::Sender<EngineState>,
    gate: Mutex<()>,
}

impl SyncEngine {
    /// `remote: None` is local-only mode; every reconciliation is skipped.
    #[must_use]
    pub fn new(
        remote: Option<Arc<dyn TaskRemote>>,
        cache: Arc<SyncCache>,
        store: SnapshotStore,
        publisher: ChangePublisher,
    ) -> Self {
        let (state, _) = watch::channel(EngineState::Idle);
        Self {
            remote,
            cache,
            store,
            publisher,
            state,
            gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<SyncCache> {
        &self.cache
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<EngineState> {
        self.state.subscribe()
    }

    fn set_state(&self, next: EngineState) {
        self.state.send_replace(next);
    }

    /// Run one reconciliation pass. Concurrent callers run one at a time.
    ///
    /// Cancellation is honored up to the write phase; once the cache is
    /// being replaced the pass completes.
    pub async fn reconcile(&self, cancel: &CancellationToken) -> ReconcileOutcome {
        let Some(remote) = &self.remote else {
            return ReconcileOutcome::Skipped;
        };

        let _pass = self.gate.lock().await;
        if cancel.is_cancelled() {
            return ReconcileOutcome::Skipped;
        }

        self.set_state(EngineState::Fetching);
        let fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            fetched = fetch_candidate(remote.as_ref()) => Some(fetched),
        };
        let candidate = match fetched {
            None => {
                tracing::debug!("reconciliation cancelled during fetch");
                self.set_state(EngineState::Idle);
                return ReconcileOutcome::Skipped;
            }
            Some(Err(error)) => {
                tracing::warn!(%error, "skipping sync cycle: task lists unavailable");
                self.set_state(EngineState::Idle);
                return ReconcileOutcome::Skipped;
            }
            Some(Ok(candidate)) => candidate,
        };

        self.set_state(EngineState::Reconciling);
        let outcome = self.apply(candidate);
        self.set_state(EngineState::Idle);
        outcome
    }

    fn apply(&self, candidate: Candidate) -> ReconcileOutcome {
        let forest = if candidate.skipped.is_empty() {
            candidate.forest
        } else {
            retain_cached_lists(candidate, &self.cache.read().tasks)
        };

        if self.cache.matches(&forest) {
            tracing::debug!("remote unchanged");
            return ReconcileOutcome::Unchanged;
        }

        let now = Utc::now();
        let snapshot = Snapshot::new(forest, Some(now));
        let task_count = snapshot.task_count();
        if let Err(error) = self.store.save(&snapshot.tasks) {
            tracing::warn!(%error, "failed to persist reconciled snapshot");
        }
        self.cache.replace(snapshot);

        tracing::info!(task_count, "task snapshot replaced");
        self.publisher.publish(TasksChanged {
            task_count,
            last_sync: now,
        });
        ReconcileOutcome::Replaced
    }
}

/// Fetch every list and assemble its tree.
///
/// A list whose tasks fail to fetch or assemble is recorded in
/// `skipped` and left empty; the others are unaffected.
///
/// # Errors
///
/// Returns the error from listing the task lists themselves.
pub async fn fetch_candidate(remote: &dyn TaskRemote) -> Result<Candidate, RemoteError> {
    let lists = remote.list_lists().await?;
    let mut candidate = Candidate {
        forest: Vec::with_capacity(lists.len()),
        skipped: HashSet::new(),
    };

    for mut list in lists {
        let built = match remote.list_tasks(&list.id).await {
            Ok(tasks) => build_forest(tasks).map_err(|error| error.to_string()),
            Err(error) => Err(error.to_string()),
        };
        match built {
            Ok(tasks) => list.tasks = tasks,
            Err(error) => {
                tracing::warn!(list_id = %list.id, %error, "skipping list");
                candidate.skipped.insert(list.id.clone());
            }
        }
        candidate.forest.push(list);
    }

    Ok(candidate)
}

/// Substitute the cached copy for every skipped list that has one.
fn retain_cached_lists(candidate: Candidate, cached: &[Task]) -> Forest {
    candidate
        .forest
        .into_iter()
        .map(|list| {
            if !candidate.skipped.contains(&list.id) {
                return list;
            }
            cached
                .iter()
                .find(|previous| previous.id == list.id)
                .cloned()
                .unwrap_or(list)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer;
    use godo_remote::InMemoryRemote;
    use pretty_assertions::assert_eq;

    fn flat(id: &str, parent: &str, position: &str) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            parent: parent.into(),
            position: position.into(),
            ..Task::default()
        }
    }

    #[tokio::test]
    async fn candidate_assembles_each_list() {
        let remote = InMemoryRemote::new();
        remote.add_list("L1", "Inbox");
        remote.put_task("L1", flat("A", "", "1"));
        remote.put_task("L1", flat("B", "A", "1"));
        remote.put_task("L1", flat("C", "A", "0"));

        let candidate = fetch_candidate(&remote).await.unwrap();
        assert!(candidate.skipped.is_empty());
        let a = &candidate.forest[0].tasks[0];
        let children: Vec<_> = a.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(children, ["C", "B"]);
    }

    #[tokio::test]
    async fn cyclic_list_is_skipped() {
        let remote = InMemoryRemote::new();
        remote.add_list("L1", "Loops");
        remote.put_task("L1", flat("x", "y", "0"));
        remote.put_task("L1", flat("y", "x", "0"));
        remote.add_list("L2", "Fine");
        remote.put_task("L2", flat("ok", "", "0"));

        let candidate = fetch_candidate(&remote).await.unwrap();
        assert_eq!(candidate.skipped, HashSet::from(["L1".to_string()]));
        assert_eq!(candidate.forest[1].tasks.len(), 1);
    }

    #[tokio::test]
    async fn local_only_mode_never_fetches() {
        let dir = tempfile::tempdir().unwrap();
        let (publisher, _receiver) = observer::channel(1);
        let engine = SyncEngine::new(
            None,
            Arc::new(SyncCache::default()),
            SnapshotStore::new(dir.path().join("tasks.json")),
            publisher,
        );

        let outcome = engine.reconcile(&CancellationToken::new()).await;
        assert_eq!(outcome, ReconcileOutcome::Skipped);
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(!dir.path().join("tasks.json").exists());
    }
}
