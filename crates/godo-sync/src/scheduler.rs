//! Background reconciliation loop.
//!
//! The loop reconciles once at startup, then on every interval tick and on
//! every coalesced foreground request, until its token is cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::engine::SyncEngine;

/// Asks the background loop for a reconciliation.
///
/// Requests made while one is already pending merge into it.
#[derive(Debug, Clone)]
pub struct SyncRequester {
    tx: mpsc::Sender<()>,
}

impl SyncRequester {
    /// Returns `false` if a request was already pending or the loop stopped.
    pub fn request(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => {
                tracing::trace!("sync already pending");
                false
            }
            Err(TrySendError::Closed(())) => false,
        }
    }
}

/// Owns the spawned loop. Dropping the handle does not stop it; call
/// [`SyncHandle::shutdown`].
pub struct SyncHandle {
    requester: SyncRequester,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Spawn the loop on the current runtime.
    #[must_use]
    pub fn spawn(engine: Arc<SyncEngine>, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run(engine, interval, rx, cancel.clone()));
        Self {
            requester: SyncRequester { tx },
            cancel,
            task,
        }
    }

    #[must_use]
    pub fn requester(&self) -> SyncRequester {
        self.requester.clone()
    }

    pub fn request_sync(&self) -> bool {
        self.requester.request()
    }

    /// Stop the timer and wait for the loop to exit. A pass already in its
    /// write phase finishes first.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(error) = self.task.await {
            tracing::warn!(%error, "sync loop ended abnormally");
        }
    }
}

async fn run(
    engine: Arc<SyncEngine>,
    interval: Duration,
    mut requests: mpsc::Receiver<()>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::debug!(interval_secs = interval.as_secs(), "sync loop started");

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
            Some(()) = requests.recv() => {}
        }
        engine.reconcile(&cancel).await;
    }

    tracing::debug!("sync loop stopped");
}
