//! In-process remote for tests and offline demos.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use godo_core::Task;

use crate::TaskRemote;
use crate::error::RemoteError;

#[derive(Default)]
struct State {
    lists: Vec<Task>,
    tasks: HashMap<String, Vec<Task>>,
    next_id: u64,
    failing_lists: HashSet<String>,
    unavailable: bool,
    fetches: usize,
}

impl State {
    fn check_available(&self) -> Result<(), RemoteError> {
        if self.unavailable {
            return Err(RemoteError::Unavailable("in-memory remote offline".into()));
        }
        Ok(())
    }

    fn list_mut(&mut self, list_id: &str) -> Result<&mut Vec<Task>, RemoteError> {
        self.tasks
            .get_mut(list_id)
            .ok_or_else(|| RemoteError::not_found("list", list_id))
    }
}

/// A task service held in memory.
///
/// Tasks are stored flat per list, with `parent`/`position` exactly as a
/// real service would report them. Failure switches let tests exercise the
/// unavailable and per-list error paths.
#[derive(Default)]
pub struct InMemoryRemote {
    state: Mutex<State>,
}

impl InMemoryRemote {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an empty list, or rename an existing one.
    pub fn add_list(&self, id: &str, title: &str) {
        let mut state = self.state();
        if let Some(list) = state.lists.iter_mut().find(|list| list.id == id) {
            list.title = title.to_string();
            return;
        }
        state.lists.push(Task::list(id, title));
        state.tasks.entry(id.to_string()).or_default();
    }

    /// Insert or overwrite a flat task in `list_id` as-is.
    pub fn put_task(&self, list_id: &str, task: Task) {
        let mut state = self.state();
        let tasks = state.tasks.entry(list_id.to_string()).or_default();
        match tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => *existing = task,
            None => tasks.push(task),
        }
    }

    /// Make `list_tasks(list_id)` fail with `Unavailable` while `failing`.
    pub fn set_list_failing(&self, list_id: &str, failing: bool) {
        let mut state = self.state();
        if failing {
            state.failing_lists.insert(list_id.to_string());
        } else {
            state.failing_lists.remove(list_id);
        }
    }

    /// Make every call fail with `Unavailable` while `unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Number of `list_tasks` calls served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.state().fetches
    }

    /// Flat copy of the tasks stored in `list_id`.
    #[must_use]
    pub fn tasks(&self, list_id: &str) -> Vec<Task> {
        self.state().tasks.get(list_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TaskRemote for InMemoryRemote {
    async fn list_lists(&self) -> Result<Vec<Task>, RemoteError> {
        let state = self.state();
        state.check_available()?;
        Ok(state.lists.clone())
    }

    async fn list_tasks(&self, list_id: &str) -> Result<Vec<Task>, RemoteError> {
        let mut state = self.state();
        state.check_available()?;
        state.fetches += 1;
        if state.failing_lists.contains(list_id) {
            return Err(RemoteError::Unavailable(format!(
                "list {list_id} is failing"
            )));
        }
        Ok(state.list_mut(list_id)?.clone())
    }

    async fn create_task(&self, list_id: &str, task: &Task) -> Result<Task, RemoteError> {
        let mut state = self.state();
        state.check_available()?;
        state.next_id += 1;
        let id = format!("mem-{}", state.next_id);

        let tasks = state.list_mut(list_id)?;
        if !task.parent.is_empty() && !tasks.iter().any(|t| t.id == task.parent) {
            return Err(RemoteError::not_found("parent task", &task.parent));
        }
        let next_position = tasks
            .iter()
            .filter(|sibling| sibling.parent == task.parent)
            .filter_map(|sibling| sibling.position.parse::<u64>().ok())
            .max()
            .map_or(0, |max| max + 1);

        let mut created = task.detached();
        created.id = id;
        created.position = format!("{next_position:020}");
        created.kind = "tasks#task".to_string();
        created.updated = Some(Utc::now());
        tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, list_id: &str, task: &Task) -> Result<Task, RemoteError> {
        let mut state = self.state();
        state.check_available()?;
        let stored = state
            .list_mut(list_id)?
            .iter_mut()
            .find(|stored| stored.id == task.id)
            .ok_or_else(|| RemoteError::not_found("task", &task.id))?;

        stored.title.clone_from(&task.title);
        stored.notes.clone_from(&task.notes);
        stored.status = task.status;
        stored.completed = task.completed;
        stored.completed_date = task.completed_date;
        stored.due_date = task.due_date;
        stored.updated = Some(Utc::now());
        Ok(stored.clone())
    }

    async fn delete_task(&self, list_id: &str, id: &str) -> Result<(), RemoteError> {
        let mut state = self.state();
        state.check_available()?;
        let tasks = state.list_mut(list_id)?;
        if !tasks.iter().any(|task| task.id == id) {
            return Err(RemoteError::not_found("task", id));
        }

        // Subtasks go with their parent.
        let mut doomed: HashSet<String> = HashSet::from([id.to_string()]);
        loop {
            let before = doomed.len();
            for task in tasks.iter() {
                if doomed.contains(&task.parent) {
                    doomed.insert(task.id.clone());
                }
            }
            if doomed.len() == before {
                break;
            }
        }
        tasks.retain(|task| !doomed.contains(&task.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn remote_with_list() -> InMemoryRemote {
        let remote = InMemoryRemote::new();
        remote.add_list("L1", "Inbox");
        remote
    }

    #[tokio::test]
    async fn create_assigns_id_and_trailing_position() {
        let remote = remote_with_list();
        let first = remote.create_task("L1", &Task::new("one")).await.unwrap();
        let second = remote.create_task("L1", &Task::new("two")).await.unwrap();

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
        assert!(first.position < second.position);
        assert_eq!(remote.list_tasks("L1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_under_unknown_parent_fails() {
        let remote = remote_with_list();
        let mut orphan = Task::new("x");
        orphan.parent = "nope".into();
        let err = remote.create_task("L1", &orphan).await.unwrap_err();
        assert!(matches!(err, RemoteError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn delete_removes_subtasks() {
        let remote = remote_with_list();
        let parent = remote.create_task("L1", &Task::new("p")).await.unwrap();
        let mut child = Task::new("c");
        child.parent.clone_from(&parent.id);
        let child = remote.create_task("L1", &child).await.unwrap();
        let mut grandchild = Task::new("g");
        grandchild.parent.clone_from(&child.id);
        remote.create_task("L1", &grandchild).await.unwrap();
        remote.create_task("L1", &Task::new("other")).await.unwrap();

        remote.delete_task("L1", &parent.id).await.unwrap();
        let left = remote.tasks("L1");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "other");
    }

    #[tokio::test]
    async fn update_changes_mutable_fields_only() {
        let remote = remote_with_list();
        let created = remote.create_task("L1", &Task::new("draft")).await.unwrap();

        let mut edit = created.clone();
        edit.title = "final".into();
        edit.position = "99999999999999999999".into();
        let updated = remote.update_task("L1", &edit).await.unwrap();

        assert_eq!(updated.title, "final");
        assert_eq!(updated.position, created.position);
    }

    #[tokio::test]
    async fn failure_switches() {
        let remote = remote_with_list();
        remote.set_list_failing("L1", true);
        assert!(remote.list_tasks("L1").await.unwrap_err().is_unavailable());
        remote.set_list_failing("L1", false);
        assert!(remote.list_tasks("L1").await.is_ok());

        remote.set_unavailable(true);
        assert!(remote.list_lists().await.unwrap_err().is_unavailable());
        assert_eq!(remote.fetch_count(), 2);
    }
}
