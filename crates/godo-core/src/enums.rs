//! Status enum for godo tasks.
//!
//! Serialized in `camelCase` so the cache file and the wire format share the
//! same spelling (`needsAction`, `completed`, `deleted`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a task.
///
/// ```text
/// needs_action ⇄ completed
///      ↓             ↓
///           deleted
/// ```
///
/// `Deleted` is transient: it marks a task whose remote delete is about to be
/// issued and is never written to the cache file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    NeedsAction,
    Completed,
    Deleted,
}

impl TaskStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::NeedsAction => &[Self::Completed, Self::Deleted],
            Self::Completed => &[Self::NeedsAction, Self::Deleted],
            Self::Deleted => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Return the string representation used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeedsAction => "needsAction",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
        }
    }

    /// Parse a wire status. Unknown values map to `NeedsAction`.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "completed" => Self::Completed,
            "deleted" => Self::Deleted,
            _ => Self::NeedsAction,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
