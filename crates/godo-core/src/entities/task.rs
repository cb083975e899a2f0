use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TaskStatus;
use crate::errors::CoreError;

/// A work item, or a task list when used as a root container.
///
/// Unset timestamps are `None` and serialize as `null`; they are never
/// written as the Unix epoch. `completed` mirrors `status == Completed` and
/// is kept in sync by [`Task::set_status`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub notes: Option<String>,
    pub status: TaskStatus,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    /// Id of the owning task, empty for a list's top-level items.
    pub parent: String,
    /// Opaque sibling ordering key assigned by the remote service.
    pub position: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub etag: String,
    #[serde(default)]
    pub self_link: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Task {
    /// A not-yet-created local task. `id` and `position` stay empty until the
    /// remote service assigns them.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// A task-list container with no items yet.
    #[must_use]
    pub fn list(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: "tasks#taskList".to_string(),
            ..Self::default()
        }
    }

    /// Whether this task sits directly under its list.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.parent.is_empty()
    }

    /// Whether `completed` agrees with `status`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.completed == (self.status == TaskStatus::Completed)
    }

    /// Move to `next`, keeping `completed` and `completed_date` in sync.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the status machine forbids
    /// the move.
    pub fn set_status(&mut self, next: TaskStatus, now: DateTime<Utc>) -> Result<(), CoreError> {
        if self.status == next {
            return Ok(());
        }
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                entity_type: "task".to_string(),
                id: self.id.clone(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        self.status = next;
        self.completed = next == TaskStatus::Completed;
        self.completed_date = self.completed.then_some(now);
        Ok(())
    }

    /// A copy of this node without its children.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            notes: self.notes.clone(),
            status: self.status,
            completed: self.completed,
            due_date: self.due_date,
            created_at: self.created_at,
            updated: self.updated,
            completed_date: self.completed_date,
            parent: self.parent.clone(),
            position: self.position.clone(),
            kind: self.kind.clone(),
            etag: self.etag.clone(),
            self_link: self.self_link.clone(),
            tasks: Vec::new(),
        }
    }

    /// Number of tasks in this subtree, excluding `self`.
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.tasks
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Depth-first search of this subtree (including `self`).
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.tasks.iter().find_map(|child| child.find(id))
    }
}
