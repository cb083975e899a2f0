//! Forest reconstruction properties: parent round-trip, sibling ordering,
//! orphan promotion and cycle rejection.

use std::collections::HashMap;

use godo_core::{CoreError, Task, build_forest, flatten};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn task(id: &str, parent: &str, position: &str) -> Task {
    Task {
        id: id.into(),
        title: format!("task {id}"),
        parent: parent.into(),
        position: position.into(),
        ..Task::default()
    }
}

fn parent_map(tasks: &[Task]) -> HashMap<String, String> {
    tasks
        .iter()
        .map(|t| (t.id.clone(), t.parent.clone()))
        .collect()
}

fn assert_siblings_sorted(group: &[Task]) {
    for pair in group.windows(2) {
        assert!(
            pair[0].position <= pair[1].position,
            "{} ({}) sorted after {} ({})",
            pair[0].id,
            pair[0].position,
            pair[1].id,
            pair[1].position
        );
    }
    for task in group {
        assert_siblings_sorted(&task.tasks);
    }
}

#[test]
fn children_follow_lexicographic_position() {
    let forest = build_forest(vec![
        task("A", "", "1"),
        task("B", "A", "1"),
        task("C", "A", "0"),
    ])
    .unwrap();

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].id, "A");
    let children: Vec<_> = forest[0].tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(children, ["C", "B"]);
}

#[rstest]
#[case(&["9", "10"], &["10", "9"])]
#[case(&["00000000000000000002", "00000000000000000001"], &["00000000000000000001", "00000000000000000002"])]
#[case(&["b", "a", "ab"], &["a", "ab", "b"])]
fn positions_compare_as_strings(#[case] input: &[&str], #[case] expected: &[&str]) {
    let tasks = input
        .iter()
        .enumerate()
        .map(|(i, pos)| task(&format!("t{i}"), "", pos))
        .collect();
    let forest = build_forest(tasks).unwrap();
    let order: Vec<_> = forest.iter().map(|t| t.position.as_str()).collect();
    assert_eq!(order, expected);
}

#[test]
fn flatten_reproduces_parent_mapping() {
    let input = vec![
        task("r1", "", "0002"),
        task("r2", "", "0001"),
        task("c1", "r1", "0001"),
        task("c2", "r1", "0000"),
        task("g1", "c1", "0000"),
        task("g2", "c2", "0005"),
        task("g3", "c2", "0003"),
        task("c3", "r2", "0000"),
    ];
    let expected = parent_map(&input);

    let forest = build_forest(input).unwrap();
    let flat = flatten(&forest);

    assert_eq!(flat.len(), expected.len());
    assert_eq!(parent_map(&flat), expected);
    assert_siblings_sorted(&forest);
}

#[test]
fn orphan_is_promoted_to_root() {
    let forest = build_forest(vec![
        task("a", "", "1"),
        task("lost", "deleted-parent", "0"),
        task("lost-child", "lost", "0"),
    ])
    .unwrap();

    let roots: Vec<_> = forest.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(roots, ["lost", "a"]);
    assert_eq!(forest[0].parent, "");
    assert_eq!(forest[0].tasks[0].id, "lost-child");
}

#[test]
fn two_node_cycle_is_malformed() {
    let err = build_forest(vec![
        task("root", "", "0"),
        task("x", "y", "0"),
        task("y", "x", "0"),
    ])
    .unwrap_err();

    match err {
        CoreError::MalformedHierarchy { id, reason } => {
            assert_eq!(id, "x");
            assert!(reason.contains("cycle"));
        }
        other => panic!("expected MalformedHierarchy, got {other:?}"),
    }
}

#[test]
fn duplicate_ids_are_malformed() {
    let err = build_forest(vec![task("a", "", "0"), task("a", "", "1")]).unwrap_err();
    assert!(matches!(err, CoreError::MalformedHierarchy { .. }));
}

#[test]
fn field_values_survive_reconstruction() {
    let mut input = task("a", "", "0");
    input.notes = Some("remember the milk".into());
    input.etag = "\"etag-1\"".into();

    let forest = build_forest(vec![input.clone()]).unwrap();
    assert_eq!(forest[0], input);
}
