// src/artifact.rs
//! Naming of the files that make up one generated resume

use std::path::{Path, PathBuf};

use crate::core::fs_ops::{self, CleanupReport};

/// Suffixes of the files pdflatex leaves next to the PDF.
pub const BYPRODUCT_EXTENSIONS: [&str; 3] = ["log", "aux", "out"];

/// Every file sharing one output prefix `<dir>/<stem>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    dir: PathBuf,
    stem: String,
}

impl Artifact {
    /// Split an output prefix into directory and stem.
    ///
    /// Returns `None` when the prefix has no usable file name (`""`, `".."`,
    /// a path ending in `..`).
    pub fn from_prefix(prefix: &Path) -> Option<Self> {
        let stem = prefix.file_name()?.to_str()?.to_string();
        let dir = match prefix.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Some(Self { dir, stem })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    fn with_extension(&self, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.stem, ext))
    }

    pub fn markup_path(&self) -> PathBuf {
        self.with_extension("tex")
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.with_extension("pdf")
    }

    pub fn byproduct_paths(&self) -> Vec<PathBuf> {
        BYPRODUCT_EXTENSIONS
            .iter()
            .map(|ext| self.with_extension(ext))
            .collect()
    }

    /// Markup, PDF and byproducts, in that order.
    pub fn all_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.markup_path(), self.pdf_path()];
        paths.extend(self.byproduct_paths());
        paths
    }

    /// The subset of [`Artifact::all_paths`] currently on disk.
    pub fn existing_paths(&self) -> Vec<PathBuf> {
        self.all_paths()
            .into_iter()
            .filter(|path| path.exists())
            .collect()
    }

    /// Delete every file of this artifact. Best-effort, see [`fs_ops::remove_files`].
    pub async fn remove(&self) -> CleanupReport {
        fs_ops::remove_files(&self.all_paths()).await
    }
}

/// What a failed generation left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialArtifact {
    pub artifact: Artifact,
    pub present: Vec<PathBuf>,
}

impl PartialArtifact {
    /// Snapshot the files of `artifact` that exist right now.
    pub fn capture(artifact: Artifact) -> Self {
        let present = artifact.existing_paths();
        Self { artifact, present }
    }

    /// The renderer log, if the renderer got far enough to write one.
    pub fn log_path(&self) -> Option<&Path> {
        self.present
            .iter()
            .find(|path| path.extension().is_some_and(|ext| ext == "log"))
            .map(PathBuf::as_path)
    }

    pub async fn cleanup(&self) -> CleanupReport {
        fs_ops::remove_files(&self.present).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_prefix_splits_dir_and_stem() {
        let artifact = Artifact::from_prefix(Path::new("out/server-1")).unwrap();
        assert_eq!(artifact.dir(), Path::new("out"));
        assert_eq!(artifact.stem(), "server-1");
        assert_eq!(artifact.pdf_path(), PathBuf::from("out/server-1.pdf"));
        assert_eq!(artifact.markup_path(), PathBuf::from("out/server-1.tex"));
    }

    #[test]
    fn test_bare_prefix_uses_current_dir() {
        let artifact = Artifact::from_prefix(Path::new("app")).unwrap();
        assert_eq!(artifact.dir(), Path::new("."));
        assert_eq!(artifact.pdf_path(), PathBuf::from("./app.pdf"));
    }

    #[test]
    fn test_invalid_prefix() {
        assert!(Artifact::from_prefix(Path::new("")).is_none());
        assert!(Artifact::from_prefix(Path::new("out/..")).is_none());
    }

    #[test]
    fn test_all_paths_cover_byproducts() {
        let artifact = Artifact::from_prefix(Path::new("x/app")).unwrap();
        let names: Vec<String> = artifact
            .all_paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["app.tex", "app.pdf", "app.log", "app.aux", "app.out"]);
    }

    #[tokio::test]
    async fn test_partial_capture_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact::from_prefix(&dir.path().join("job")).unwrap();
        std::fs::write(artifact.markup_path(), "\\documentclass{article}").unwrap();
        std::fs::write(dir.path().join("job.log"), "! LaTeX Error").unwrap();

        let partial = PartialArtifact::capture(artifact.clone());
        assert_eq!(partial.present.len(), 2);
        assert_eq!(partial.log_path(), Some(dir.path().join("job.log").as_path()));

        let report = partial.cleanup().await;
        assert_eq!(report.removed.len(), 2);
        assert!(report.is_clean());
        assert!(artifact.existing_paths().is_empty());
    }
}
