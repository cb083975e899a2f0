//! Foreground edits.
//!
//! Each edit goes to the remote first. Only after the remote accepts it is
//! the local arena updated and the snapshot rewritten; a rejected edit leaves
//! local state untouched. A background sync is then requested so the cache
//! converges on what the remote now reports.
//!
//! Without a remote (local-only mode) edits apply directly, with ids and
//! positions generated here.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use godo_core::tree::MAX_HIERARCHY_DEPTH;
use godo_core::{CoreError, Forest, Task, TaskStatus, TaskTree};
use godo_remote::TaskRemote;
use godo_store::SnapshotStore;

use crate::error::SyncError;
use crate::scheduler::SyncRequester;

/// Id of the list created for a fresh local-only store.
pub const LOCAL_LIST_ID: &str = "local";
const LOCAL_LIST_TITLE: &str = "My Tasks";

const WELCOME_TITLE: &str = "Welcome to godo!";
const WELCOME_NOTES: &str = "This is your first task. Use `godo add` to create a new task, \
                             `godo rename` to edit this one, or `godo delete` to remove it.";

static LOCAL_SEQ: AtomicU64 = AtomicU64::new(0);

pub struct TaskService {
    tree: TaskTree,
    remote: Option<Arc<dyn TaskRemote>>,
    store: SnapshotStore,
    requester: Option<SyncRequester>,
}

impl TaskService {
    /// # Errors
    ///
    /// Returns `CoreError::MalformedHierarchy` if `forest` has duplicate or
    /// empty ids.
    pub fn new(
        forest: &[Task],
        remote: Option<Arc<dyn TaskRemote>>,
        store: SnapshotStore,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            tree: TaskTree::from_forest(forest)?,
            remote,
            store,
            requester: None,
        })
    }

    /// Request a background sync after every successful edit.
    #[must_use]
    pub fn with_requester(mut self, requester: SyncRequester) -> Self {
        self.requester = Some(requester);
        self
    }

    #[must_use]
    pub const fn is_local_only(&self) -> bool {
        self.remote.is_none()
    }

    #[must_use]
    pub const fn tree(&self) -> &TaskTree {
        &self.tree
    }

    #[must_use]
    pub fn forest(&self) -> Forest {
        self.tree.to_forest()
    }

    /// Seed an empty local-only store with one list holding a welcome task.
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Store` if the seeded snapshot cannot be saved.
    pub fn seed_welcome(&mut self) -> Result<bool, SyncError> {
        if !self.tree.is_empty() || !self.is_local_only() {
            return Ok(false);
        }

        let now = Utc::now();
        let mut list = Task::list(LOCAL_LIST_ID, LOCAL_LIST_TITLE);
        list.created_at = Some(now);
        list.updated = Some(now);
        self.tree.insert("", list)?;

        let welcome = Task {
            id: next_local_id(),
            title: WELCOME_TITLE.to_string(),
            notes: Some(WELCOME_NOTES.to_string()),
            created_at: Some(now),
            updated: Some(now),
            position: format_position(0),
            ..Task::default()
        };
        self.tree.insert(LOCAL_LIST_ID, welcome)?;
        self.persist()?;
        tracing::info!("seeded welcome task");
        Ok(true)
    }

    /// Create a task titled `title` under `owner_id`, which is a list id or
    /// a task id. The remote assigns the new task's position; in local-only
    /// mode it goes last among its siblings.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown owner, `CoreError::Validation`
    /// for an empty title or an owner already nested
    /// [`MAX_HIERARCHY_DEPTH`] levels deep, the remote error if the remote
    /// rejects it, or a store error if the snapshot cannot be saved.
    pub async fn create(&mut self, owner_id: &str, title: &str) -> Result<Task, SyncError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("task title must not be empty".into()).into());
        }
        let list_id = self.list_of(owner_id)?;
        if self.tree.child_depth(owner_id) >= MAX_HIERARCHY_DEPTH {
            return Err(CoreError::Validation(format!(
                "tasks cannot nest more than {MAX_HIERARCHY_DEPTH} levels deep"
            ))
            .into());
        }

        let mut task = Task::new(title);
        if !self.tree.is_list(owner_id) {
            task.parent = owner_id.to_string();
        }

        let created = match &self.remote {
            Some(remote) => {
                let mut created = remote.create_task(&list_id, &task).await?;
                if created.created_at.is_none() {
                    created.created_at = task.created_at;
                }
                created
            }
            None => {
                task.id = next_local_id();
                task.position = self.next_local_position(owner_id);
                task.kind = "tasks#task".to_string();
                task.updated = task.created_at;
                task
            }
        };

        self.tree.insert(owner_id, created.clone())?;
        tracing::debug!(id = %created.id, list_id, "task created");
        self.commit()?;
        Ok(created)
    }

    /// # Errors
    ///
    /// See [`TaskService::create`].
    pub async fn rename(&mut self, id: &str, title: &str) -> Result<Task, SyncError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("task title must not be empty".into()).into());
        }
        self.update(id, |task| {
            task.title = title.to_string();
            Ok(())
        })
        .await
    }

    /// Replace the notes. Empty notes clear them.
    ///
    /// # Errors
    ///
    /// See [`TaskService::create`].
    pub async fn set_notes(&mut self, id: &str, notes: Option<&str>) -> Result<Task, SyncError> {
        let notes = notes
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);
        self.update(id, move |task| {
            task.notes = notes;
            Ok(())
        })
        .await
    }

    /// # Errors
    ///
    /// See [`TaskService::create`].
    pub async fn set_due(
        &mut self,
        id: &str,
        due: Option<DateTime<Utc>>,
    ) -> Result<Task, SyncError> {
        self.update(id, |task| {
            task.due_date = due;
            Ok(())
        })
        .await
    }

    /// Flip between `needsAction` and `completed`.
    ///
    /// # Errors
    ///
    /// See [`TaskService::create`].
    pub async fn toggle_complete(&mut self, id: &str) -> Result<Task, SyncError> {
        self.update(id, |task| {
            let next = if task.status == TaskStatus::Completed {
                TaskStatus::NeedsAction
            } else {
                TaskStatus::Completed
            };
            task.set_status(next, Utc::now())
        })
        .await
    }

    /// Delete a task and its subtasks. Returns the removed subtree, marked
    /// deleted at its root.
    ///
    /// # Errors
    ///
    /// See [`TaskService::create`].
    pub async fn delete(&mut self, id: &str) -> Result<Task, SyncError> {
        let list_id = self.editable_list_of(id)?;
        let mut doomed = self.node(id)?.clone();
        doomed.set_status(TaskStatus::Deleted, Utc::now())?;

        if let Some(remote) = &self.remote {
            remote.delete_task(&list_id, &doomed.id).await?;
        }

        let mut removed = self
            .tree
            .remove(id)
            .ok_or_else(|| CoreError::task_not_found(id))?;
        removed.status = doomed.status;
        removed.completed = doomed.completed;
        removed.completed_date = doomed.completed_date;
        tracing::debug!(id, list_id, subtasks = removed.descendant_count(), "task deleted");
        self.commit()?;
        Ok(removed)
    }

    async fn update<F>(&mut self, id: &str, edit: F) -> Result<Task, SyncError>
    where
        F: FnOnce(&mut Task) -> Result<(), CoreError> + Send,
    {
        let list_id = self.editable_list_of(id)?;
        let mut edited = self.node(id)?.clone();
        edit(&mut edited)?;

        let stored = match &self.remote {
            Some(remote) => {
                let mut stored = remote.update_task(&list_id, &edited).await?;
                if stored.created_at.is_none() {
                    stored.created_at = edited.created_at;
                }
                stored
            }
            None => {
                edited.updated = Some(Utc::now());
                edited
            }
        };

        self.tree.replace(stored.clone())?;
        tracing::debug!(id, list_id, "task updated");
        self.commit()?;
        Ok(stored)
    }

    fn node(&self, id: &str) -> Result<&Task, CoreError> {
        self.tree.get(id).ok_or_else(|| CoreError::task_not_found(id))
    }

    fn list_of(&self, id: &str) -> Result<String, CoreError> {
        self.tree
            .list_id_of(id)
            .map(str::to_string)
            .ok_or_else(|| CoreError::task_not_found(id))
    }

    /// Owning list of a task. Lists themselves are not editable here.
    fn editable_list_of(&self, id: &str) -> Result<String, CoreError> {
        if self.tree.is_list(id) {
            return Err(CoreError::Validation(format!(
                "{id} is a task list, not a task"
            )));
        }
        self.list_of(id)
    }

    fn next_local_position(&self, owner_id: &str) -> String {
        let next = self
            .tree
            .last_child_position(owner_id)
            .and_then(|last| last.parse::<u64>().ok())
            .map_or(0, |last| last + 1);
        format_position(next)
    }

    fn persist(&self) -> Result<(), SyncError> {
        self.store.save(&self.tree.to_forest())?;
        Ok(())
    }

    fn commit(&self) -> Result<(), SyncError> {
        self.persist()?;
        if let Some(requester) = &self.requester {
            requester.request();
        }
        Ok(())
    }
}

fn format_position(n: u64) -> String {
    format!("{n:020}")
}

fn next_local_id() -> String {
    let seq = LOCAL_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("local-{}-{seq}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn local_service(dir: &tempfile::TempDir) -> TaskService {
        let store = SnapshotStore::new(dir.path().join("tasks.json"));
        TaskService::new(&[], None, store).unwrap()
    }

    #[test]
    fn welcome_seeded_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = local_service(&dir);

        assert!(service.seed_welcome().unwrap());
        assert!(!service.seed_welcome().unwrap());

        let forest = service.forest();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, LOCAL_LIST_ID);
        assert_eq!(forest[0].tasks[0].title, WELCOME_TITLE);
        assert!(dir.path().join("tasks.json").exists());
    }

    #[tokio::test]
    async fn local_creates_get_increasing_positions() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = local_service(&dir);
        service.seed_welcome().unwrap();

        let a = service.create(LOCAL_LIST_ID, "a").await.unwrap();
        let b = service.create(LOCAL_LIST_ID, "b").await.unwrap();
        assert!(a.position < b.position);
        assert_ne!(a.id, b.id);

        let titles: Vec<_> = service.forest()[0]
            .tasks
            .iter()
            .map(|t| t.title.clone())
            .collect();
        assert_eq!(titles, [WELCOME_TITLE, "a", "b"]);
    }

    #[tokio::test]
    async fn lists_cannot_be_edited_as_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = local_service(&dir);
        service.seed_welcome().unwrap();

        let err = service.rename(LOCAL_LIST_ID, "x").await.unwrap_err();
        assert!(matches!(err, SyncError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = local_service(&dir);
        service.seed_welcome().unwrap();

        let err = service.create(LOCAL_LIST_ID, "   ").await.unwrap_err();
        assert!(matches!(err, SyncError::Core(CoreError::Validation(_))));
    }
}
