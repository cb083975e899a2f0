use std::sync::Arc;

use anyhow::Context;
use godo_config::GodoConfig;
use godo_core::Forest;
use godo_remote::{GoogleTasksClient, TaskRemote};
use godo_store::SnapshotStore;
use godo_sync::{ChangeReceiver, ReconcileOutcome, SyncCache, SyncEngine, TaskService, observer};
use tokio_util::sync::CancellationToken;

/// Everything a command needs: config, the snapshot file for the active
/// mode and, in Google mode, the remote client.
pub struct AppContext {
    pub config: GodoConfig,
    pub store: SnapshotStore,
    pub remote: Option<Arc<dyn TaskRemote>>,
}

impl AppContext {
    pub fn init(config: GodoConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let use_google = config.general.use_google;
        let store = SnapshotStore::new(config.storage.snapshot_path(use_google));
        let remote = if use_google {
            let client = GoogleTasksClient::from_config(&config.google)
                .context("Google mode needs an authorized account")?;
            Some(Arc::new(client) as Arc<dyn TaskRemote>)
        } else {
            None
        };

        Ok(Self {
            config,
            store,
            remote,
        })
    }

    pub const fn is_google(&self) -> bool {
        self.remote.is_some()
    }

    pub fn load_forest(&self) -> anyhow::Result<Forest> {
        self.store
            .load()
            .with_context(|| format!("failed to read {}", self.store.path().display()))
    }

    /// Mutation service over the snapshot on disk. A fresh local store is
    /// seeded with a welcome task.
    pub fn service(&self) -> anyhow::Result<TaskService> {
        let forest = self.load_forest()?;
        let mut service = TaskService::new(&forest, self.remote.clone(), self.store.clone())?;
        service.seed_welcome()?;
        Ok(service)
    }

    /// Sync engine whose cache starts from `forest`.
    pub fn engine(&self, forest: Forest) -> (Arc<SyncEngine>, ChangeReceiver) {
        let (publisher, changes) = observer::channel(self.config.sync.notify_capacity());
        let engine = SyncEngine::new(
            self.remote.clone(),
            Arc::new(SyncCache::from_forest(forest)),
            self.store.clone(),
            publisher,
        );
        (Arc::new(engine), changes)
    }

    /// Follow-up reconciliation after a foreground edit.
    pub async fn sync_after_edit(&self, service: &TaskService) -> ReconcileOutcome {
        if !self.is_google() {
            return ReconcileOutcome::Skipped;
        }
        let (engine, _changes) = self.engine(service.forest());
        engine.reconcile(&CancellationToken::new()).await
    }
}
