// src/web/handlers/cv_handlers.rs
use rocket::data::{Data, Limits, ToByteUnit};
use rocket::http::ContentType;
use rocket::State;
use std::io;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::artifact::Artifact;
use crate::types::user::User;
use crate::web::types::{ApiError, PdfResponse, ServerConfig};

pub const ARTIFACT_PREFIX: &str = "server";
pub const DOWNLOAD_FILENAME: &str = "resume.pdf";

pub async fn generate_cv_handler(
    body: Data<'_>,
    limits: &Limits,
    config: &State<ServerConfig>,
) -> Result<PdfResponse, ApiError> {
    let limit = limits.get("json").unwrap_or(1.mebibytes());
    let bytes = match body.open(limit).into_bytes().await {
        Ok(bytes) if bytes.is_complete() => bytes.into_inner(),
        Ok(_) => {
            warn!(limit = %limit, "Request body exceeds limit");
            return Err(ApiError::bad_request());
        }
        Err(e) => {
            warn!(error = %e, "Failed to read request body");
            return Err(ApiError::bad_request());
        }
    };

    let user: User = serde_json::from_slice(&bytes).map_err(|e| {
        warn!(error = %e, "Failed to decode resume JSON");
        ApiError::bad_request()
    })?;

    let prefix = config
        .output_dir
        .join(format!("{}-{}", ARTIFACT_PREFIX, Uuid::new_v4()));

    let artifact = match config.generator.create_file(&user, &prefix).await {
        Ok(artifact) => artifact,
        Err(e) => {
            error!(prefix = %prefix.display(), error = %e.kind, "Failed creating file");
            if let Some(partial) = e.partial {
                let report = partial.cleanup().await;
                if !report.is_clean() {
                    warn!(prefix = %prefix.display(), failed = report.failed.len(), "Partial artifact cleanup incomplete");
                }
            }
            return Err(ApiError::failed_creating_file());
        }
    };

    send_artifact(artifact).await
}

/// Read the PDF into memory, then delete every file of `artifact` once,
/// whether or not the read succeeded.
async fn send_artifact(artifact: Artifact) -> Result<PdfResponse, ApiError> {
    let read = read_artifact(&artifact).await;
    let report = artifact.remove().await;
    if !report.is_clean() {
        warn!(
            stem = %artifact.stem(),
            failed = report.failed.len(),
            "Artifact cleanup incomplete"
        );
    }

    match read {
        Ok(data) => {
            info!(stem = %artifact.stem(), pdf_size = data.len(), "Sending generated resume");
            Ok(PdfResponse::new(data, DOWNLOAD_FILENAME))
        }
        Err(ReadFailure::Open(e)) => {
            error!(stem = %artifact.stem(), error = %e, "Failed processing file");
            Err(ApiError::failed_processing_file())
        }
        Err(ReadFailure::Read(e)) => {
            error!(stem = %artifact.stem(), error = %e, "Failed sending file");
            Err(ApiError::failed_sending_file())
        }
    }
}

enum ReadFailure {
    Open(io::Error),
    Read(io::Error),
}

async fn read_artifact(artifact: &Artifact) -> Result<Vec<u8>, ReadFailure> {
    let mut file = tokio::fs::File::open(artifact.pdf_path())
        .await
        .map_err(ReadFailure::Open)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .await
        .map_err(ReadFailure::Read)?;
    Ok(data)
}

pub async fn example_handler(
    config: &State<ServerConfig>,
) -> Result<(ContentType, Vec<u8>), ApiError> {
    match tokio::fs::read(&config.example_path).await {
        Ok(body) => Ok((ContentType::JSON, body)),
        Err(e) => {
            error!(
                path = %config.example_path.display(),
                error = %e,
                "Failed to read example file"
            );
            Err(ApiError::failed_processing_file())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn artifact_in(dir: &Path) -> Artifact {
        let artifact = Artifact::from_prefix(&dir.join("server-test")).unwrap();
        std::fs::write(artifact.markup_path(), "\\documentclass{article}").unwrap();
        std::fs::write(artifact.byproduct_paths()[0].clone(), "log").unwrap();
        artifact
    }

    fn leftover(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_send_artifact_returns_pdf_and_removes_files() {
        let out = tempfile::tempdir().unwrap();
        let artifact = artifact_in(out.path());
        std::fs::write(artifact.pdf_path(), b"%PDF-1.4").unwrap();

        let response = send_artifact(artifact).await.unwrap();
        assert_eq!(response.data, b"%PDF-1.4");
        assert_eq!(response.filename, DOWNLOAD_FILENAME);
        assert!(leftover(out.path()).is_empty());
    }

    #[tokio::test]
    async fn test_unopenable_pdf_is_failed_processing() {
        let out = tempfile::tempdir().unwrap();
        let artifact = artifact_in(out.path());

        let err = send_artifact(artifact).await.unwrap_err();
        assert_eq!(err, ApiError::failed_processing_file());
        assert!(leftover(out.path()).is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_pdf_is_failed_sending() {
        let out = tempfile::tempdir().unwrap();
        let artifact = artifact_in(out.path());
        // Opens fine on unix, fails on read with EISDIR.
        std::fs::create_dir(artifact.pdf_path()).unwrap();

        let err = send_artifact(artifact).await.unwrap_err();
        assert_eq!(err, ApiError::failed_sending_file());
        assert!(leftover(out.path()).is_empty());
    }
}
