//! Forest reconstruction from flat parent-pointer tasks.
//!
//! The remote service reports each list as a flat collection in which every
//! task names its parent by id and carries an opaque `position`. Sibling
//! order is lexicographic on `position`, never numeric: `"10" < "9"`.

use std::collections::HashMap;

use crate::entities::Task;
use crate::errors::CoreError;

/// Maximum task nesting below a list, counting a list's top-level tasks as
/// depth 0.
///
/// Bounded by what the cache file can be read back with: `serde_json` stops
/// at 128 nested containers, each task level costs an object plus its
/// `tasks` array, and the file wraps tasks in the outer array, the list
/// object and the list's `tasks` array.
pub const MAX_HIERARCHY_DEPTH: usize = 60;

/// `(position, id)`. The id only breaks ties so output is deterministic.
type SortKey = (String, String);

/// Build the forest of one list from its flat task collection.
///
/// Tasks whose `parent` names no task in `tasks` are promoted to the root
/// level with their `parent` cleared, never dropped. Any incoming `tasks`
/// children are discarded; the hierarchy comes from `parent` alone.
///
/// # Errors
///
/// Returns `CoreError::MalformedHierarchy` for duplicate ids, nesting deeper
/// than [`MAX_HIERARCHY_DEPTH`], or tasks whose parent chain never reaches a
/// root (a cycle).
pub fn build_forest(tasks: Vec<Task>) -> Result<Vec<Task>, CoreError> {
    let mut by_id: HashMap<String, Task> = HashMap::with_capacity(tasks.len());
    for mut task in tasks {
        task.tasks.clear();
        if by_id.contains_key(&task.id) {
            return Err(CoreError::malformed(&task.id, "duplicate task id"));
        }
        by_id.insert(task.id.clone(), task);
    }

    let orphans: Vec<String> = by_id
        .values()
        .filter(|task| !task.parent.is_empty() && !by_id.contains_key(&task.parent))
        .map(|task| task.id.clone())
        .collect();
    for id in orphans {
        if let Some(task) = by_id.get_mut(&id) {
            tracing::warn!(
                task_id = %id,
                parent = %task.parent,
                "dangling parent reference; promoting task to root level"
            );
            task.parent.clear();
        }
    }

    let mut roots: Vec<SortKey> = Vec::new();
    let mut children: HashMap<String, Vec<SortKey>> = HashMap::new();
    for task in by_id.values() {
        let key = (task.position.clone(), task.id.clone());
        if task.parent.is_empty() {
            roots.push(key);
        } else {
            children.entry(task.parent.clone()).or_default().push(key);
        }
    }
    roots.sort_unstable();
    for group in children.values_mut() {
        group.sort_unstable();
    }

    let mut forest = Vec::with_capacity(roots.len());
    for (_, id) in &roots {
        forest.push(attach(id, 0, &mut by_id, &children)?);
    }

    if let Some(stranded) = by_id.keys().min() {
        return Err(CoreError::malformed(
            stranded,
            "parent chain never reaches a root (cycle)",
        ));
    }

    Ok(forest)
}

fn attach(
    id: &str,
    depth: usize,
    by_id: &mut HashMap<String, Task>,
    children: &HashMap<String, Vec<SortKey>>,
) -> Result<Task, CoreError> {
    if depth >= MAX_HIERARCHY_DEPTH {
        return Err(CoreError::malformed(
            id,
            format!("nesting exceeds {MAX_HIERARCHY_DEPTH} levels"),
        ));
    }

    let mut task = by_id
        .remove(id)
        .ok_or_else(|| CoreError::malformed(id, "task reached twice while assembling"))?;

    if let Some(group) = children.get(id) {
        task.tasks.reserve(group.len());
        for (_, child_id) in group {
            task.tasks.push(attach(child_id, depth + 1, by_id, children)?);
        }
    }

    Ok(task)
}

/// Walk a forest depth-first, returning every node without its children.
///
/// The inverse of [`build_forest`]: the output carries the same id → parent
/// mapping, in pre-order.
#[must_use]
pub fn flatten(forest: &[Task]) -> Vec<Task> {
    let mut flat = Vec::new();
    for task in forest {
        push_flat(task, &mut flat);
    }
    flat
}

fn push_flat(task: &Task, flat: &mut Vec<Task>) {
    flat.push(task.detached());
    for child in &task.tasks {
        push_flat(child, flat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, parent: &str, position: &str) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            parent: parent.into(),
            position: position.into(),
            ..Task::default()
        }
    }

    #[test]
    fn empty_input_yields_empty_forest() {
        assert!(build_forest(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn incoming_children_are_discarded() {
        let mut a = task("a", "", "1");
        a.tasks.push(task("ghost", "a", "0"));
        let forest = build_forest(vec![a]).unwrap();
        assert!(forest[0].tasks.is_empty());
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let err = build_forest(vec![task("a", "a", "1")]).unwrap_err();
        assert!(matches!(err, CoreError::MalformedHierarchy { ref id, .. } if id == "a"));
    }

    #[test]
    fn depth_guard_trips_on_long_chains() {
        let mut tasks = vec![task("n0", "", "0")];
        for i in 1..=MAX_HIERARCHY_DEPTH {
            tasks.push(task(&format!("n{i}"), &format!("n{}", i - 1), "0"));
        }
        let err = build_forest(tasks).unwrap_err();
        assert!(err.to_string().contains("nesting exceeds"));
    }

    #[test]
    fn chain_at_depth_limit_is_accepted() {
        let mut tasks = vec![task("n0", "", "0")];
        for i in 1..MAX_HIERARCHY_DEPTH {
            tasks.push(task(&format!("n{i}"), &format!("n{}", i - 1), "0"));
        }
        let forest = build_forest(tasks).unwrap();

        let mut depth = 0;
        let mut node = &forest[0];
        while let Some(child) = node.tasks.first() {
            node = child;
            depth += 1;
        }
        assert_eq!(depth, MAX_HIERARCHY_DEPTH - 1);
    }

    #[test]
    fn flatten_drops_children_but_keeps_order() {
        let forest = build_forest(vec![
            task("a", "", "1"),
            task("b", "a", "0"),
            task("c", "", "2"),
        ])
        .unwrap();
        let ids: Vec<_> = flatten(&forest).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
