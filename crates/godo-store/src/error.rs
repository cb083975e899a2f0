//! Persistence error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing, flushing or renaming failed. The previous file is intact.
    #[error("Persistence failure at {}: {reason}", .path.display())]
    Persistence { path: PathBuf, reason: String },

    /// The file exists but could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not parse.
    #[error("Corrupt file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn persistence(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
