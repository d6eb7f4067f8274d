// src/web/handlers/system_handlers.rs
use rocket::http::Status;
use rocket::State;
use tracing::{error, info};

use crate::web::types::{ApiError, ServerConfig};

/// Liveness of the external renderer, not of the service itself.
pub async fn health_handler(config: &State<ServerConfig>) -> Result<Status, ApiError> {
    let renderer = config.generator.renderer();

    match renderer.version().await {
        Ok(output) => {
            let stdout = output.stdout_lossy();
            let version = stdout.lines().next().unwrap_or_default();
            info!(
                program = %renderer.program().display(),
                version = %version,
                "Health check passed"
            );
            Ok(Status::Ok)
        }
        Err(e) => {
            if let Some(output) = e.output() {
                error!(stdout = %output.stdout_lossy(), "Renderer version output");
            }
            error!(error = %e, "Server is not healthy");
            Err(ApiError::failed_processing_file())
        }
    }
}
