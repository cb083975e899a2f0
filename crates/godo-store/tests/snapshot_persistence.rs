//! On-disk behavior of the snapshot file.

use chrono::{TimeZone, Utc};
use godo_core::tree::MAX_HIERARCHY_DEPTH;
use godo_core::{Task, TaskStatus, build_forest};
use godo_store::{SnapshotStore, StoreError};
use pretty_assertions::assert_eq;

fn sample_forest() -> Vec<Task> {
    let mut done = Task {
        id: "t2".into(),
        title: "file taxes".into(),
        position: "00000000000000000001".into(),
        ..Task::default()
    };
    done.set_status(
        TaskStatus::Completed,
        Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap(),
    )
    .unwrap();

    let open = Task {
        id: "t1".into(),
        title: "renew passport".into(),
        notes: Some("bring photo".into()),
        position: "00000000000000000000".into(),
        ..Task::default()
    };

    let mut list = Task::list("L1", "Admin");
    list.tasks = vec![open, done];
    vec![list]
}

#[test]
fn missing_file_loads_as_empty_forest() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("never-written.json"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn save_then_load_returns_same_forest() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("cache.json"));
    let forest = sample_forest();

    store.save(&forest).unwrap();
    assert_eq!(store.load().unwrap(), forest);
}

#[test]
fn unset_due_date_stays_unset() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("cache.json"));
    store.save(&sample_forest()).unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(!raw.contains("0001-01-01"));
    assert!(!raw.contains("1970-01-01"));

    let loaded = store.load().unwrap();
    assert!(loaded[0].tasks.iter().all(|t| t.due_date.is_none()));
}

#[test]
fn interrupted_write_leaves_previous_snapshot_readable() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("cache.json"));
    let forest = sample_forest();
    store.save(&forest).unwrap();

    // A crash between writing the temp file and the rename leaves this behind.
    std::fs::write(dir.path().join(".godo-a1b2c3.tmp"), b"[{\"id\": \"tru").unwrap();

    assert_eq!(store.load().unwrap(), forest);
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = SnapshotStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");
}

#[test]
fn unwritable_location_is_a_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file-not-dir");
    std::fs::write(&blocker, "x").unwrap();

    let store = SnapshotStore::new(blocker.join("cache.json"));
    let err = store.save(&sample_forest()).unwrap_err();
    assert!(matches!(err, StoreError::Persistence { .. }), "got {err:?}");
}

/// Task `i` of a single parent chain.
fn link(i: usize) -> Task {
    Task {
        id: format!("n{i}"),
        title: format!("level {i}"),
        parent: i.checked_sub(1).map(|up| format!("n{up}")).unwrap_or_default(),
        position: "00000000000000000000".into(),
        ..Task::default()
    }
}

fn chain_list(levels: usize) -> Task {
    let mut nested: Option<Task> = None;
    for i in (0..levels).rev() {
        let mut node = link(i);
        node.tasks.extend(nested.take());
        nested = Some(node);
    }
    let mut list = Task::list("L1", "Deep");
    list.tasks.extend(nested);
    list
}

#[test]
fn deepest_accepted_chain_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("cache.json"));

    let flat = (0..MAX_HIERARCHY_DEPTH).map(link).collect();
    let mut list = Task::list("L1", "Deep");
    list.tasks = build_forest(flat).unwrap();
    assert_eq!(list, chain_list(MAX_HIERARCHY_DEPTH));

    store.save(std::slice::from_ref(&list)).unwrap();
    assert_eq!(store.load().unwrap(), vec![list]);
}

#[test]
fn too_deep_chain_is_refused_and_previous_file_kept() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("cache.json"));
    let forest = sample_forest();
    store.save(&forest).unwrap();

    let err = store
        .save(&[chain_list(MAX_HIERARCHY_DEPTH + 1)])
        .unwrap_err();
    assert!(matches!(err, StoreError::Persistence { .. }), "got {err:?}");
    assert_eq!(store.load().unwrap(), forest);
}
