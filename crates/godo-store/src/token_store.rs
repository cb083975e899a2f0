//! OAuth token file.
//!
//! The token is stored as JSON with owner-only permissions (0600).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::atomic::write_atomic;
use crate::error::StoreError;

const TOKEN_MODE: u32 = 0o600;

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Absent means the token never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl OAuthToken {
    /// Whether the token expires within `buffer_secs` of `now`.
    #[must_use]
    pub fn expires_within(&self, buffer_secs: i64, now: DateTime<Utc>) -> bool {
        self.expiry
            .is_some_and(|expiry| expiry - TimeDelta::seconds(buffer_secs) <= now)
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Read` on I/O failure and `StoreError::Corrupt` if
    /// the file does not hold a token.
    pub fn load(&self) -> Result<Option<OAuthToken>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    path: self.path.clone(),
                    source,
                }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the token cannot be written.
    pub fn save(&self, token: &OAuthToken) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(token)
            .map_err(|e| StoreError::persistence(&self.path, format!("serialize: {e}")))?;
        write_atomic(&self.path, &json, Some(TOKEN_MODE))
    }

    /// Remove the token file. Missing is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the file exists but cannot be
    /// removed.
    pub fn delete(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::persistence(&self.path, format!("remove: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn token(expiry: Option<DateTime<Utc>>) -> OAuthToken {
        OAuthToken {
            access_token: "ya29.access".into(),
            token_type: "Bearer".into(),
            refresh_token: Some("1//refresh".into()),
            expiry,
        }
    }

    #[test]
    fn save_load_delete() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join("godo").join("token.json"));
        assert_eq!(store.load().unwrap(), None);

        let stored = token(Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()));
        store.save(&stored).expect("save");
        assert_eq!(store.load().unwrap(), Some(stored));

        store.delete().expect("delete");
        store.delete().expect("second delete is a no-op");
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join("token.json"));
        store.save(&token(None)).expect("save");

        let mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn reads_files_without_optional_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("token.json");
        fs::write(&path, r#"{"access_token":"abc"}"#).unwrap();

        let loaded = TokenStore::new(&path).load().unwrap().unwrap();
        assert_eq!(loaded.token_type, "Bearer");
        assert_eq!(loaded.refresh_token, None);
        assert_eq!(loaded.authorization(), "Bearer abc");
    }

    #[test]
    fn expiry_buffer() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert!(!token(None).expires_within(60, now));
        assert!(token(Some(now + TimeDelta::seconds(30))).expires_within(60, now));
        assert!(!token(Some(now + TimeDelta::seconds(120))).expires_within(60, now));
        assert!(token(Some(now - TimeDelta::seconds(1))).expires_within(60, now));
    }
}
