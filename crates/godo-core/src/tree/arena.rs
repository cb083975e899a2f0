//! Id-keyed arena over a forest.
//!
//! Nodes live in a map keyed by id; placement lives in an owner → ordered
//! child ids index. Lists are owned by the implicit root (`""`). A list's
//! top-level tasks are owned by the list but keep an empty `parent`, which is
//! how the remote service reports them.

use std::collections::HashMap;

use crate::entities::Task;
use crate::errors::CoreError;
use crate::tree::builder::MAX_HIERARCHY_DEPTH;

const ROOT: &str = "";

#[derive(Debug, Clone, Default)]
pub struct TaskTree {
    nodes: HashMap<String, Task>,
    children: HashMap<String, Vec<String>>,
    owners: HashMap<String, String>,
}

impl TaskTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a forest of list containers.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MalformedHierarchy` if an id is empty or appears
    /// twice.
    pub fn from_forest(forest: &[Task]) -> Result<Self, CoreError> {
        let mut tree = Self::new();
        for list in forest {
            tree.index(ROOT, list)?;
        }
        Ok(tree)
    }

    fn index(&mut self, owner: &str, task: &Task) -> Result<(), CoreError> {
        if task.id.is_empty() {
            return Err(CoreError::malformed(&task.title, "task has no id"));
        }
        if self.nodes.contains_key(&task.id) {
            return Err(CoreError::malformed(&task.id, "duplicate task id"));
        }

        self.nodes.insert(task.id.clone(), task.detached());
        self.owners.insert(task.id.clone(), owner.to_string());
        self.children
            .entry(owner.to_string())
            .or_default()
            .push(task.id.clone());

        for child in &task.tasks {
            self.index(&task.id, child)?;
        }
        Ok(())
    }

    /// Reassemble the owned forest.
    #[must_use]
    pub fn to_forest(&self) -> Vec<Task> {
        self.child_ids(ROOT)
            .iter()
            .filter_map(|id| self.assemble(id))
            .collect()
    }

    fn assemble(&self, id: &str) -> Option<Task> {
        let mut task = self.nodes.get(id)?.clone();
        task.tasks = self
            .child_ids(id)
            .iter()
            .filter_map(|child| self.assemble(child))
            .collect();
        Some(task)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// The node without children. Use [`TaskTree::child_ids`] to descend.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.nodes.get(id)
    }

    /// Ordered ids directly owned by `id` (`""` for the lists).
    #[must_use]
    pub fn child_ids(&self, id: &str) -> &[String] {
        self.children.get(id).map_or(&[], Vec::as_slice)
    }

    /// List containers in order.
    pub fn lists(&self) -> impl Iterator<Item = &Task> {
        self.child_ids(ROOT)
            .iter()
            .filter_map(|id| self.nodes.get(id))
    }

    #[must_use]
    pub fn is_list(&self, id: &str) -> bool {
        self.owners.get(id).is_some_and(|owner| owner == ROOT)
    }

    /// Id of the list that (transitively) owns `id`.
    #[must_use]
    pub fn list_id_of(&self, id: &str) -> Option<&str> {
        let mut current = self.nodes.get_key_value(id)?.0.as_str();
        for _ in 0..=self.nodes.len() {
            let owner = self.owners.get(current)?;
            if owner == ROOT {
                return Some(current);
            }
            current = owner.as_str();
        }
        None
    }

    /// Depth a new child of `owner` would sit at, with a list's top-level
    /// tasks at 0.
    #[must_use]
    pub fn child_depth(&self, owner: &str) -> usize {
        let mut depth = 0;
        let mut current = owner;
        while let Some(next) = self.owners.get(current) {
            if next == ROOT {
                break;
            }
            depth += 1;
            current = next;
        }
        depth
    }

    /// Position of the last child of `owner`, if it has any.
    #[must_use]
    pub fn last_child_position(&self, owner: &str) -> Option<&str> {
        self.child_ids(owner)
            .last()
            .and_then(|id| self.nodes.get(id))
            .map(|task| task.position.as_str())
    }

    /// Place a new node under `owner` (a list or a task), keeping siblings in
    /// position order. Children of `task` are ignored.
    ///
    /// The node's `parent` is rewritten to match its placement: empty under a
    /// list, the owner's id under a task.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if `owner` is unknown and
    /// `CoreError::Validation` if the task has no id, its id is taken, or it
    /// would nest [`MAX_HIERARCHY_DEPTH`] levels or deeper.
    pub fn insert(&mut self, owner: &str, mut task: Task) -> Result<(), CoreError> {
        if task.id.is_empty() {
            return Err(CoreError::Validation(
                "cannot place a task without an id".into(),
            ));
        }
        if self.nodes.contains_key(&task.id) {
            return Err(CoreError::Validation(format!(
                "task id {} is already placed",
                task.id
            )));
        }
        if owner != ROOT && !self.nodes.contains_key(owner) {
            return Err(CoreError::task_not_found(owner));
        }
        if owner != ROOT && self.child_depth(owner) >= MAX_HIERARCHY_DEPTH {
            return Err(CoreError::Validation(format!(
                "tasks cannot nest more than {MAX_HIERARCHY_DEPTH} levels deep"
            )));
        }

        task.tasks.clear();
        task.parent = if owner == ROOT || self.is_list(owner) {
            String::new()
        } else {
            owner.to_string()
        };

        let id = task.id.clone();
        let key = (task.position.as_str(), id.as_str());
        let siblings = self.children.entry(owner.to_string()).or_default();
        let at = siblings.partition_point(|sibling| {
            self.nodes
                .get(sibling)
                .is_some_and(|s| (s.position.as_str(), s.id.as_str()) < key)
        });
        siblings.insert(at, id.clone());
        self.owners.insert(id.clone(), owner.to_string());
        self.nodes.insert(id, task);
        Ok(())
    }

    /// Overwrite a node's fields in place. Placement (`parent`) and children
    /// are preserved; a changed `position` re-sorts the node among its
    /// siblings.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if no node has `task.id`.
    pub fn replace(&mut self, mut task: Task) -> Result<(), CoreError> {
        let Some(existing) = self.nodes.get(&task.id) else {
            return Err(CoreError::task_not_found(&task.id));
        };
        let moved = existing.position != task.position;
        task.parent.clone_from(&existing.parent);
        task.tasks.clear();

        let id = task.id.clone();
        self.nodes.insert(id.clone(), task);
        if moved {
            self.resort_siblings_of(&id);
        }
        Ok(())
    }

    fn resort_siblings_of(&mut self, id: &str) {
        let Some(owner) = self.owners.get(id) else {
            return;
        };
        let nodes = &self.nodes;
        if let Some(siblings) = self.children.get_mut(owner) {
            siblings.sort_by(|a, b| {
                let key = |id: &String| {
                    nodes
                        .get(id)
                        .map(|t| (t.position.clone(), t.id.clone()))
                        .unwrap_or_default()
                };
                key(a).cmp(&key(b))
            });
        }
    }

    /// Detach `id` and its whole subtree, returning it assembled.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let subtree = self.assemble(id)?;

        if let Some(owner) = self.owners.get(id)
            && let Some(siblings) = self.children.get_mut(owner)
        {
            siblings.retain(|sibling| sibling != id);
        }

        let mut pending = vec![id.to_string()];
        while let Some(current) = pending.pop() {
            self.nodes.remove(&current);
            self.owners.remove(&current);
            if let Some(kids) = self.children.remove(&current) {
                pending.extend(kids);
            }
        }

        Some(subtree)
    }
}
