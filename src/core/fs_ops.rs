// src/core/fs_ops.rs
//! File system helpers shared by the generator and the request handlers

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// A file that could not be deleted.
#[derive(Debug)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Outcome of a best-effort deletion.
///
/// Files that were already gone are neither removed nor failed.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete `paths`, logging instead of returning failures.
///
/// A directory found at one of `paths` is removed with its contents.
pub async fn remove_files(paths: &[PathBuf]) -> CleanupReport {
    let mut report = CleanupReport::default();

    for path in paths {
        let removal = match fs::symlink_metadata(path).await {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).await,
            _ => fs::remove_file(path).await,
        };
        match removal {
            Ok(()) => {
                debug!(path = %path.display(), "Removed file");
                report.removed.push(path.clone());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove file");
                report.failed.push(CleanupFailure {
                    path: path.clone(),
                    error: e,
                });
            }
        }
    }

    report
}

/// Ensure directory exists
pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .await
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        info!("Created directory: {}", path.display());
    }
    Ok(())
}

/// Normalize path against a base directory
pub fn normalize_path(base: &Path, relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        base.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remove_files_reports_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.pdf");
        let missing = dir.path().join("a.log");
        std::fs::write(&present, b"%PDF").unwrap();

        let paths = vec![present.clone(), missing];
        let first = remove_files(&paths).await;
        assert_eq!(first.removed, vec![present.clone()]);
        assert!(first.is_clean());
        assert!(!present.exists());

        let second = remove_files(&paths).await;
        assert!(second.removed.is_empty());
        assert!(second.is_clean());
    }

    #[tokio::test]
    async fn test_remove_directory_at_path() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("a.pdf");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("page"), b"x").unwrap();

        let report = remove_files(&[sub.clone()]).await;
        assert!(report.is_clean());
        assert_eq!(report.removed, vec![sub.clone()]);
        assert!(!sub.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_remove_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // Not a directory, so nothing below it can be removed.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let target = blocker.join("a.pdf");

        let report = remove_files(&[target.clone()]).await;
        assert!(!report.is_clean());
        assert_eq!(report.failed[0].path, target);
    }

    #[tokio::test]
    async fn test_ensure_dir_exists_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_dir_exists(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_normalize_path() {
        let base = Path::new("/srv/app");
        assert_eq!(
            normalize_path(base, Path::new("out")),
            PathBuf::from("/srv/app/out")
        );
        assert_eq!(
            normalize_path(base, Path::new("/tmp/out")),
            PathBuf::from("/tmp/out")
        );
    }
}
