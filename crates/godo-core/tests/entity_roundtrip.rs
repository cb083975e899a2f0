//! Serde roundtrip and JsonSchema validation for the cache file format.

use chrono::{TimeZone, Utc};
use godo_core::{Task, TaskStatus};
use pretty_assertions::assert_eq;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn sample_list() -> Task {
    let stamp = Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap();
    let mut child = Task {
        id: "t-child".into(),
        title: "buy stamps".into(),
        parent: "t-parent".into(),
        position: "00000000000000000000".into(),
        updated: Some(stamp),
        ..Task::default()
    };
    child.set_status(TaskStatus::Completed, stamp).unwrap();

    let parent = Task {
        id: "t-parent".into(),
        title: "post office".into(),
        notes: Some("before noon".into()),
        due_date: Some(stamp),
        position: "00000000000000000001".into(),
        kind: "tasks#task".into(),
        etag: "\"abc\"".into(),
        self_link: "https://example.invalid/t-parent".into(),
        tasks: vec![child],
        ..Task::default()
    };

    let mut list = Task::list("L1", "Errands");
    list.tasks.push(parent);
    list
}

#[test]
fn task_tree_roundtrip_and_validate() {
    let forest = vec![sample_list()];

    let json_str = serde_json::to_string_pretty(&forest).unwrap();
    let recovered: Vec<Task> = serde_json::from_str(&json_str).unwrap();
    assert_eq!(recovered, forest);

    let schema = serde_json::to_value(schema_for!(Vec<Task>)).unwrap();
    let instance = serde_json::to_value(&forest).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "Schema validation failed: {errors:?}");
}

#[test]
fn every_field_is_written_even_when_unset() {
    let value = serde_json::to_value(Task::default()).unwrap();
    let object = value.as_object().unwrap();
    for field in [
        "id",
        "title",
        "notes",
        "status",
        "completed",
        "due_date",
        "created_at",
        "updated",
        "completed_date",
        "parent",
        "position",
        "tasks",
    ] {
        assert!(object.contains_key(field), "missing field {field}");
    }
    assert!(object["due_date"].is_null());
    assert_eq!(object["status"], "needsAction");
}

#[test]
fn null_due_date_reads_back_unset() {
    let json = r#"{
        "id": "t1", "title": "x", "notes": null, "status": "needsAction",
        "completed": false, "due_date": null, "created_at": null,
        "updated": null, "completed_date": null, "parent": "", "position": "0"
    }"#;
    let task: Task = serde_json::from_str(json).unwrap();
    assert!(task.due_date.is_none());
    assert!(task.tasks.is_empty());
}
