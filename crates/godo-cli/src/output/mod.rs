use godo_core::Task;
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

pub mod tree;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Tree => Ok(render_fields(&serde_json::to_value(value)?)),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

pub fn output_forest(forest: &[Task], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => output(&forest, format),
        OutputFormat::Tree => {
            print!("{}", tree::render_forest(forest));
            Ok(())
        }
    }
}

pub fn output_task(task: &Task, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => output(task, format),
        OutputFormat::Tree => {
            print!("{}", tree::render_subtree(task));
            Ok(())
        }
    }
}

/// `key: value` lines for an object, sorted by key.
fn render_fields(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut entries = map.iter().collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            entries
                .into_iter()
                .map(|(key, value)| format!("{key}: {}", value_to_cell(value)))
                .collect::<Vec<_>>()
                .join("\n")
        }
        other => value_to_cell(other),
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Serialize)]
    struct Sample {
        outcome: &'static str,
        task_count: usize,
        last_sync: Option<String>,
    }

    #[test]
    fn tree_format_renders_sorted_fields() {
        let sample = Sample {
            outcome: "replaced",
            task_count: 3,
            last_sync: None,
        };
        assert_eq!(
            render(&sample, OutputFormat::Tree).unwrap(),
            "last_sync: -\noutcome: replaced\ntask_count: 3"
        );
    }

    #[test]
    fn json_format_is_pretty() {
        let sample = Sample {
            outcome: "unchanged",
            task_count: 0,
            last_sync: Some("2025-01-01T00:00:00Z".into()),
        };
        let rendered = render(&sample, OutputFormat::Json).unwrap();
        assert!(rendered.contains("\n  \"outcome\": \"unchanged\""));
    }
}
