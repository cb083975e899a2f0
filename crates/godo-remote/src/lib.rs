//! # godo-remote
//!
//! Typed access to the remote task service.
//!
//! [`TaskRemote`] is the seam the sync engine and the mutation path depend
//! on. [`GoogleTasksClient`] talks to the Google Tasks v1 REST API with a
//! bearer token managed by [`oauth::TokenSource`]; [`InMemoryRemote`] keeps
//! everything in process.
//!
//! Tasks cross this boundary flat: `parent` and `position` are set, `tasks`
//! is empty. Lists come back as root containers (see [`Task::list`]).

pub mod google;
pub mod memory;
pub mod oauth;
pub mod wire;

mod error;
mod http;

pub use error::RemoteError;
pub use google::GoogleTasksClient;
pub use memory::InMemoryRemote;

use async_trait::async_trait;
use godo_core::Task;

/// Operations against the remote task service.
///
/// Tasks are addressed through their owning list.
#[async_trait]
pub trait TaskRemote: Send + Sync {
    /// All task lists as childless root containers.
    async fn list_lists(&self) -> Result<Vec<Task>, RemoteError>;

    /// Every task in `list_id`, flat, including completed and hidden ones.
    async fn list_tasks(&self, list_id: &str) -> Result<Vec<Task>, RemoteError>;

    /// Create `task` under `task.parent` (empty for top level). Returns the
    /// stored task with its assigned `id` and `position`.
    async fn create_task(&self, list_id: &str, task: &Task) -> Result<Task, RemoteError>;

    /// Overwrite the mutable fields of an existing task.
    async fn update_task(&self, list_id: &str, task: &Task) -> Result<Task, RemoteError>;

    /// Delete a task and its subtasks.
    async fn delete_task(&self, list_id: &str, id: &str) -> Result<(), RemoteError>;
}
