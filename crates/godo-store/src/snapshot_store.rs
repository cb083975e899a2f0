//! Task forest snapshot on disk.
//!
//! The file is a pretty-printed JSON array of task trees in the shape of
//! [`godo_core::Task`]. `last_sync` is not part of the file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use godo_core::tree::MAX_HIERARCHY_DEPTH;
use godo_core::{Forest, Task, TaskStatus};

use crate::atomic::write_atomic;
use crate::error::StoreError;

const SNAPSHOT_MODE: u32 = 0o644;

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the last persisted forest. A missing file is an empty forest.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Read` on I/O failure and `StoreError::Corrupt` if
    /// the file is not a valid forest.
    pub fn load(&self) -> Result<Forest, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no snapshot on disk");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let forest: Forest =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(
            path = %self.path.display(),
            roots = forest.len(),
            "loaded snapshot"
        );
        Ok(forest)
    }

    /// Atomically replace the snapshot with `forest`.
    ///
    /// Subtrees marked deleted are pruned before writing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the file cannot be written, or if
    /// a list nests tasks deeper than [`MAX_HIERARCHY_DEPTH`] and the file
    /// could not be loaded again. The previous snapshot stays intact.
    pub fn save(&self, forest: &[Task]) -> Result<(), StoreError> {
        if let Some(list) = forest
            .iter()
            .find(|list| levels(&list.tasks) > MAX_HIERARCHY_DEPTH)
        {
            return Err(StoreError::persistence(
                &self.path,
                format!(
                    "list {} nests tasks deeper than {MAX_HIERARCHY_DEPTH} levels",
                    list.id
                ),
            ));
        }

        let json = if forest.iter().any(contains_deleted) {
            serde_json::to_vec_pretty(&prune_deleted(forest))
        } else {
            serde_json::to_vec_pretty(forest)
        }
        .map_err(|e| StoreError::persistence(&self.path, format!("serialize: {e}")))?;

        write_atomic(&self.path, &json, Some(SNAPSHOT_MODE))?;
        tracing::debug!(
            path = %self.path.display(),
            bytes = json.len(),
            "saved snapshot"
        );
        Ok(())
    }
}

fn levels(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .map(|task| 1 + levels(&task.tasks))
        .max()
        .unwrap_or(0)
}

fn contains_deleted(task: &Task) -> bool {
    task.status == TaskStatus::Deleted || task.tasks.iter().any(contains_deleted)
}

fn prune_deleted(forest: &[Task]) -> Vec<Task> {
    forest
        .iter()
        .filter(|task| task.status != TaskStatus::Deleted)
        .map(|task| {
            let mut kept = task.detached();
            kept.tasks = prune_deleted(&task.tasks);
            kept
        })
        .collect()
}
