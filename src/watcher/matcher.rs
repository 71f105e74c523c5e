//! Recursive save-file matching over the watch root.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ScanError;
use crate::Result;

/// Extension matched by the scanner. Case-sensitive.
const SAVE_EXTENSION: &str = "lsv";

/// Scan the tree rooted at `root` for save files.
///
/// Returns every regular file whose extension is `.lsv`, recursively.
/// Idempotent and side-effect-free: repeated calls with no filesystem change
/// return equal sets. Errors on individual entries are logged and skipped;
/// only an unusable root fails the scan, in which case the caller treats the
/// match set as empty.
///
/// # Errors
///
/// Returns an error if the root does not exist or cannot be read.
pub fn scan(root: &Path) -> std::result::Result<BTreeSet<PathBuf>, ScanError> {
    std::fs::metadata(root).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ScanError::RootMissing {
                path: root.display().to_string(),
            }
        } else {
            ScanError::RootUnreadable {
                path: root.display().to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    let mut matched = BTreeSet::new();

    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_save_file(entry.path()) {
                    matched.insert(entry.path().to_path_buf());
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error walking watch root");
            }
        }
    }

    tracing::debug!(
        root = %root.display(),
        matched = matched.len(),
        "Scan complete"
    );

    Ok(matched)
}

/// Async version of the scan, run on the blocking pool.
///
/// # Errors
///
/// Returns an error if the root is unusable or the scan task fails.
pub async fn scan_async(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let root = root.to_path_buf();

    tokio::task::spawn_blocking(move || scan(&root).map_err(crate::Error::Scan))
        .await
        .map_err(|e| crate::Error::internal(format!("scan task failed: {e}")))?
}

/// Check whether a path carries the save-file extension.
fn is_save_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SAVE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_save_file() {
        assert!(is_save_file(Path::new("Save_Honour_01.lsv")));
        assert!(!is_save_file(Path::new("Save_Honour_01.LSV")));
        assert!(!is_save_file(Path::new("screenshot.png")));
        assert!(!is_save_file(Path::new("lsv")));
    }

    #[test]
    fn test_scan_finds_nested_saves() {
        let tmp = TempDir::new().unwrap();
        let story = tmp.path().join("Story").join("Save_01");
        fs::create_dir_all(&story).unwrap();
        fs::write(story.join("Save_01.lsv"), b"save").unwrap();
        fs::write(tmp.path().join("Quick_02.lsv"), b"save").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"not a save").unwrap();

        let matched = scan(tmp.path()).unwrap();

        assert_eq!(matched.len(), 2);
        assert!(matched.contains(&story.join("Save_01.lsv")));
        assert!(matched.contains(&tmp.path().join("Quick_02.lsv")));
    }

    #[test]
    fn test_scan_skips_directories_named_like_saves() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("folder.lsv")).unwrap();

        let matched = scan(tmp.path()).unwrap();
        assert!(matched.is_empty());
    }

    #[test]
    fn test_scan_missing_root() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");

        let err = scan(&missing).unwrap_err();
        assert!(matches!(err, ScanError::RootMissing { .. }));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.lsv"), b"save").unwrap();

        let first = scan(tmp.path()).unwrap();
        let second = scan(tmp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_scan_async() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.lsv"), b"save").unwrap();

        let matched = scan_async(tmp.path()).await.unwrap();
        assert_eq!(matched.len(), 1);
    }
}
