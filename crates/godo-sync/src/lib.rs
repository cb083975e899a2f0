//! # godo-sync
//!
//! Keeps the local snapshot converged with the remote task service.
//!
//! - [`SyncEngine`]: one reconciliation pass (fetch, assemble, compare,
//!   replace)
//! - [`SyncHandle`]: the background loop driving the engine on an interval
//!   and on coalesced foreground requests
//! - [`SyncCache`]: the shared in-memory snapshot
//! - [`observer`]: best-effort change notifications
//! - [`TaskService`]: foreground edits, remote first

pub mod cache;
pub mod engine;
pub mod error;
pub mod mutation;
pub mod observer;
pub mod scheduler;

pub use cache::SyncCache;
pub use engine::{EngineState, ReconcileOutcome, SyncEngine};
pub use error::SyncError;
pub use mutation::TaskService;
pub use observer::{ChangePublisher, ChangeReceiver, TasksChanged};
pub use scheduler::{SyncHandle, SyncRequester};
