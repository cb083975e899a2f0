//! Local file locations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_data_dir() -> String {
    "~/.local/share/godo".to_string()
}

fn default_cache_file() -> String {
    "google_tasks_cache.json".to_string()
}

fn default_tasks_file() -> String {
    "tasks.json".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the snapshot files. `~` and `$VAR` are expanded.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Snapshot of the remote forest, rewritten by reconciliation.
    #[serde(default = "default_cache_file")]
    pub cache_file: String,

    /// Forest used in local-only mode.
    #[serde(default = "default_tasks_file")]
    pub tasks_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_file: default_cache_file(),
            tasks_file: default_tasks_file(),
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub fn data_dir_path(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }

    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir_path().join(&self.cache_file)
    }

    #[must_use]
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir_path().join(&self.tasks_file)
    }

    /// The snapshot file for the chosen mode.
    #[must_use]
    pub fn snapshot_path(&self, use_google: bool) -> PathBuf {
        if use_google {
            self.cache_path()
        } else {
            self.tasks_path()
        }
    }
}

/// Expand a leading `~/` and any `$VAR` / `${VAR}` references.
///
/// Unset variables expand to the empty string.
#[must_use]
pub fn expand_path(raw: &str) -> PathBuf {
    let expanded = expand_env(raw);
    if expanded == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    if let Some(rest) = expanded.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(expanded)
}

fn expand_env(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let mut name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                name.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if !(c.is_ascii_alphanumeric() || c == '_') {
                    break;
                }
                name.push(c);
                chars.next();
            }
        }

        if name.is_empty() {
            out.push('$');
        } else {
            out.push_str(&std::env::var(&name).unwrap_or_default());
        }
    }

    out
}
