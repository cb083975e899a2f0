//! Indented text rendering of task trees.

use std::fmt::Write;

use godo_core::{Task, TaskStatus};

const INDENT: &str = "  ";

/// Lists as headings, tasks indented beneath them.
pub fn render_forest(forest: &[Task]) -> String {
    if forest.is_empty() {
        return String::from("(no tasks)\n");
    }
    let mut out = String::new();
    for list in forest {
        let _ = writeln!(out, "{} ({})", list.title, list.id);
        for task in &list.tasks {
            write_task(&mut out, task, 1);
        }
    }
    out
}

pub fn render_subtree(task: &Task) -> String {
    let mut out = String::new();
    write_task(&mut out, task, 0);
    out
}

fn write_task(out: &mut String, task: &Task, depth: usize) {
    let pad = INDENT.repeat(depth);
    let marker = match task.status {
        TaskStatus::Completed => "[x]",
        TaskStatus::Deleted => "[-]",
        TaskStatus::NeedsAction => "[ ]",
    };
    let _ = write!(out, "{pad}{marker} {}", task.title);
    if let Some(due) = task.due_date {
        let _ = write!(out, "  due {}", due.format("%Y-%m-%d"));
    }
    let _ = writeln!(out, "  ({})", task.id);
    if let Some(notes) = &task.notes {
        for line in notes.lines() {
            let _ = writeln!(out, "{pad}{INDENT}  | {line}");
        }
    }
    for child in &task.tasks {
        write_task(out, child, depth + 1);
    }
}
