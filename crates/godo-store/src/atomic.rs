use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::StoreError;

/// Prefix of in-flight temporary files. Leftovers from a crash are ignored by
/// readers and may be removed at any time.
pub(crate) const TEMP_PREFIX: &str = ".godo-";
pub(crate) const TEMP_SUFFIX: &str = ".tmp";

/// Replace `path` with `contents` atomically.
///
/// `mode` sets Unix permissions on the new file before it becomes visible.
///
/// # Errors
///
/// Returns `StoreError::Persistence` if the directory cannot be created or
/// any write, sync or rename step fails. The destination is untouched in
/// that case and the temporary file is removed.
pub fn write_atomic(path: &Path, contents: &[u8], mode: Option<u32>) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .map_err(|e| StoreError::persistence(path, format!("mkdir {}: {e}", dir.display())))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| StoreError::persistence(path, format!("create temp file: {e}")))?;

    tmp.write_all(contents)
        .and_then(|()| tmp.flush())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| StoreError::persistence(path, format!("write temp file: {e}")))?;

    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(mode))
            .map_err(|e| StoreError::persistence(path, format!("chmod {mode:o}: {e}")))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.persist(path)
        .map_err(|e| StoreError::persistence(path, format!("rename: {}", e.error)))?;

    // Make the rename itself durable.
    #[cfg(unix)]
    if let Err(error) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        tracing::debug!(%error, dir = %dir.display(), "directory fsync failed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_contents_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("file.json");

        write_atomic(&path, b"first", None).expect("first write");
        write_atomic(&path, b"second", None).expect("second write");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(TEMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn applies_requested_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("secret");
        write_atomic(&path, b"x", Some(0o600)).expect("write");

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn rename_onto_directory_fails_without_touching_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "intact").unwrap();

        let err = write_atomic(&target, b"x", None).unwrap_err();
        assert!(matches!(err, StoreError::Persistence { .. }));
        assert_eq!(
            std::fs::read_to_string(target.join("keep")).unwrap(),
            "intact"
        );
    }
}
