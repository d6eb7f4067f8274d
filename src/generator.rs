// src/generator.rs
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info};

use crate::artifact::{Artifact, PartialArtifact};
use crate::config::RendererConfig;
use crate::core::markup::ResumeMarkup;
use crate::core::process::{run_command, CommandError, CommandOutput};
use crate::types::user::User;

/// The external typesetting program.
#[derive(Debug, Clone)]
pub struct Renderer {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl Renderer {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Ask the renderer for its version; succeeds iff it can be invoked.
    pub async fn version(&self) -> Result<CommandOutput, CommandError> {
        let mut args = self.args.clone();
        args.push("-version".to_string());
        run_command(&self.program, &args, self.timeout).await
    }

    /// Typeset `artifact`'s markup file into its PDF.
    pub async fn render(&self, artifact: &Artifact) -> Result<CommandOutput, CommandError> {
        let mut args = self.args.clone();
        args.push(format!("-output-directory={}", artifact.dir().display()));
        args.push(format!("-jobname={}", artifact.stem()));
        args.push(artifact.markup_path().display().to_string());
        run_command(&self.program, &args, self.timeout).await
    }
}

#[derive(Debug, Error)]
pub enum GenerateErrorKind {
    #[error("invalid output prefix: {}", .0.display())]
    InvalidPrefix(PathBuf),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Render(#[from] CommandError),

    #[error("renderer produced no output at {}", .0.display())]
    MissingOutput(PathBuf),
}

/// A failed generation, with whatever files it left on disk.
///
/// `partial` is `None` only when nothing could have been written.
#[derive(Debug, Error)]
#[error("resume generation failed")]
pub struct GenerateError {
    #[source]
    pub kind: GenerateErrorKind,
    pub partial: Option<PartialArtifact>,
}

impl GenerateError {
    fn new(kind: GenerateErrorKind, artifact: Option<Artifact>) -> Self {
        Self {
            kind,
            partial: artifact.map(PartialArtifact::capture),
        }
    }
}

/// Turns a [`User`] into a PDF on disk.
#[derive(Debug, Clone)]
pub struct Generator {
    renderer: Renderer,
}

impl Generator {
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(Renderer::new(config))
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Write the markup for `user` next to `output_prefix` and typeset it.
    ///
    /// On success the returned artifact's PDF is a non-empty regular file. The
    /// markup and byproducts stay on disk; removing them is up to the caller.
    pub async fn create_file(
        &self,
        user: &User,
        output_prefix: &Path,
    ) -> Result<Artifact, GenerateError> {
        let artifact = Artifact::from_prefix(output_prefix).ok_or_else(|| {
            GenerateError::new(
                GenerateErrorKind::InvalidPrefix(output_prefix.to_path_buf()),
                None,
            )
        })?;

        fs::create_dir_all(artifact.dir()).await.map_err(|source| {
            GenerateError::new(
                GenerateErrorKind::Write {
                    path: artifact.dir().to_path_buf(),
                    source,
                },
                None,
            )
        })?;

        let markup_path = artifact.markup_path();
        let markup = ResumeMarkup::render(user);
        if let Err(source) = fs::write(&markup_path, markup).await {
            return Err(GenerateError::new(
                GenerateErrorKind::Write {
                    path: markup_path,
                    source,
                },
                Some(artifact),
            ));
        }
        debug!(path = %markup_path.display(), "Wrote markup");

        match self.renderer.render(&artifact).await {
            Ok(output) => {
                debug!(stdout = %output.stdout_lossy(), "Renderer finished");
            }
            Err(e) => {
                if let Some(output) = e.output() {
                    error!(
                        stem = %artifact.stem(),
                        stdout = %output.stdout_lossy(),
                        stderr = %output.stderr_lossy(),
                        "Renderer output"
                    );
                }
                return Err(GenerateError::new(e.into(), Some(artifact)));
            }
        }

        let pdf_path = artifact.pdf_path();
        let has_content = fs::metadata(&pdf_path)
            .await
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false);
        if !has_content {
            return Err(GenerateError::new(
                GenerateErrorKind::MissingOutput(pdf_path),
                Some(artifact),
            ));
        }

        info!(
            name = %user.name,
            pdf = %pdf_path.display(),
            "Successfully compiled resume"
        );
        Ok(artifact)
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::types::user::Experience;

    fn jane() -> User {
        User {
            name: "Jane Doe".to_string(),
            experience: vec![Experience {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_file_produces_non_empty_pdf() {
        let scripts = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let generator = Generator::from_config(&sh_renderer(scripts.path(), FAKE_RENDERER, 10));

        let artifact = generator
            .create_file(&jane(), &out.path().join("nested/app"))
            .await
            .unwrap();

        let pdf = std::fs::metadata(artifact.pdf_path()).unwrap();
        assert!(pdf.len() > 0);
        let tex = std::fs::read_to_string(artifact.markup_path()).unwrap();
        assert!(tex.contains("Jane Doe"));
        assert!(artifact.byproduct_paths()[0].exists());

        let report = artifact.remove().await;
        assert_eq!(report.removed.len(), 4);
        assert!(artifact.existing_paths().is_empty());
    }

    #[tokio::test]
    async fn test_renderer_failure_reports_partial_files() {
        let scripts = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let generator =
            Generator::from_config(&sh_renderer(scripts.path(), FAILING_RENDERER, 10));

        let err = generator
            .create_file(&jane(), &out.path().join("app"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.kind,
            GenerateErrorKind::Render(CommandError::Failed { .. })
        ));
        let partial = err.partial.unwrap();
        assert_eq!(partial.present.len(), 2);
        assert!(partial.log_path().is_some());

        partial.cleanup().await;
        assert!(partial.artifact.existing_paths().is_empty());
    }

    #[tokio::test]
    async fn test_missing_pdf_is_an_error() {
        let scripts = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let generator = Generator::from_config(&sh_renderer(scripts.path(), SILENT_RENDERER, 10));

        let err = generator
            .create_file(&jane(), &out.path().join("app"))
            .await
            .unwrap_err();

        assert!(matches!(err.kind, GenerateErrorKind::MissingOutput(_)));
        assert_eq!(err.partial.unwrap().present, vec![out.path().join("app.tex")]);
    }

    #[tokio::test]
    async fn test_pdf_directory_is_not_output() {
        let scripts = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let generator =
            Generator::from_config(&sh_renderer(scripts.path(), DIRECTORY_RENDERER, 10));

        let err = generator
            .create_file(&jane(), &out.path().join("app"))
            .await
            .unwrap_err();

        assert!(matches!(err.kind, GenerateErrorKind::MissingOutput(_)));
        assert!(out.path().join("app.pdf").is_dir());
    }

    #[tokio::test]
    async fn test_missing_renderer() {
        let out = tempfile::tempdir().unwrap();
        let generator = Generator::from_config(&missing_renderer());

        let err = generator
            .create_file(&jane(), &out.path().join("app"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.kind,
            GenerateErrorKind::Render(CommandError::Spawn { .. })
        ));
        assert!(generator.renderer().version().await.is_err());
    }

    #[tokio::test]
    async fn test_hanging_renderer_times_out() {
        let scripts = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let generator = Generator::from_config(&sh_renderer(scripts.path(), HANGING_RENDERER, 1));

        let err = generator
            .create_file(&jane(), &out.path().join("app"))
            .await
            .unwrap_err();

        match err.kind {
            GenerateErrorKind::Render(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_prefix_has_no_partial() {
        let generator = Generator::from_config(&missing_renderer());
        let err = generator.create_file(&jane(), Path::new("")).await.unwrap_err();

        assert!(matches!(err.kind, GenerateErrorKind::InvalidPrefix(_)));
        assert!(err.partial.is_none());
    }

    #[tokio::test]
    async fn test_version_with_fake_renderer() {
        let scripts = tempfile::tempdir().unwrap();
        let generator = Generator::from_config(&sh_renderer(scripts.path(), FAKE_RENDERER, 10));

        let output = generator.renderer().version().await.unwrap();
        assert!(output.stdout_lossy().contains("fake pdfTeX"));
    }
}
