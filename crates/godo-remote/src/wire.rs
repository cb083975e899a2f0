//! Google Tasks v1 resource shapes and their mapping to [`Task`].
//!
//! Timestamps travel as RFC 3339 strings. An incoming timestamp that does
//! not parse is treated as unset; outgoing `due` is omitted when unset and
//! `completed` is only sent for completed tasks.

use chrono::{DateTime, SecondsFormat, Utc};
use godo_core::{Task, TaskStatus};
use serde::{Deserialize, Serialize};

/// One page of a collection response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTaskList {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub etag: String,
    #[serde(default)]
    pub title: String,
    pub updated: Option<String>,
    #[serde(default)]
    pub self_link: String,
}

impl WireTaskList {
    /// The list as a root container of the forest.
    #[must_use]
    pub fn into_container(self) -> Task {
        let mut list = Task::list(self.id, self.title);
        if !self.kind.is_empty() {
            list.kind = self.kind;
        }
        list.etag = self.etag;
        list.self_link = self.self_link;
        list.updated = parse_timestamp(self.updated.as_deref());
        list
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTask {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub etag: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<String>,
    #[serde(default, skip_serializing)]
    pub deleted: bool,
    #[serde(default, skip_serializing)]
    pub hidden: bool,
}

impl WireTask {
    /// Request body for a create or update of `task`.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        let completed = task.status == TaskStatus::Completed;
        Self {
            id: task.id.clone(),
            etag: task.etag.clone(),
            title: task.title.clone(),
            notes: task.notes.clone(),
            status: task.status.as_str().to_string(),
            due: task.due_date.map(format_timestamp),
            completed: completed
                .then(|| format_timestamp(task.completed_date.unwrap_or_else(Utc::now))),
            ..Self::default()
        }
    }

    /// Flat task with `parent`/`position` as sent by the service.
    #[must_use]
    pub fn into_task(self) -> Task {
        let status = TaskStatus::from_wire(&self.status);
        let completed_date = if status == TaskStatus::Completed {
            parse_timestamp(self.completed.as_deref())
        } else {
            None
        };
        Task {
            id: self.id,
            title: self.title,
            notes: self.notes.filter(|notes| !notes.is_empty()),
            status,
            completed: status == TaskStatus::Completed,
            due_date: parse_timestamp(self.due.as_deref()),
            created_at: None,
            updated: parse_timestamp(self.updated.as_deref()),
            completed_date,
            parent: self.parent,
            position: self.position,
            kind: self.kind,
            etag: self.etag,
            self_link: self.self_link,
            tasks: Vec::new(),
        }
    }
}

/// Parse an RFC 3339 timestamp. Missing, empty or malformed values are unset.
#[must_use]
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(error) => {
            tracing::debug!(%error, raw, "ignoring unparseable timestamp");
            None
        }
    }
}

#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
