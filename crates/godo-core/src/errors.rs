//! Cross-cutting error types for godo.
//!
//! Domain-specific errors (`StoreError`, `RemoteError`) are defined in their
//! respective crates. `SyncError` in `godo-sync` is where they converge for
//! foreground callers.

use thiserror::Error;

/// Errors that can be raised by any godo crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A status transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Parent references could not be assembled into a forest (cycle,
    /// unbounded depth, duplicate id).
    #[error("Malformed hierarchy at task {id}: {reason}")]
    MalformedHierarchy { id: String, reason: String },

    /// Data failed validation (empty title, missing id, bad placement).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    #[must_use]
    pub fn task_not_found(id: &str) -> Self {
        Self::NotFound {
            entity_type: "task".to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        Self::MalformedHierarchy {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
