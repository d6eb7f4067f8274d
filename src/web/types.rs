// src/web/types.rs
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{Request, Response};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::generator::Generator;
use crate::types::MessageResponse;

#[derive(Debug)]
pub struct PdfResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl PdfResponse {
    pub fn new(data: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            data,
            filename: filename.into(),
        }
    }
}

impl<'r> Responder<'r, 'static> for PdfResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::PDF)
            .raw_header(
                "Content-Disposition",
                format!("inline; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

/// A failure the API reports as `{"message": ...}` with a fixed status.
///
/// Messages are constants: internal error details never reach the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiError {
    pub status: Status,
    pub message: &'static str,
}

impl ApiError {
    pub const fn new(status: Status, message: &'static str) -> Self {
        Self { status, message }
    }

    pub const fn bad_request() -> Self {
        Self::new(Status::BadRequest, "Bad request")
    }

    pub const fn method_not_allowed() -> Self {
        Self::new(Status::MethodNotAllowed, "Method not allowed")
    }

    pub const fn failed_creating_file() -> Self {
        Self::new(Status::InternalServerError, "Failed creating file")
    }

    pub const fn failed_processing_file() -> Self {
        Self::new(Status::InternalServerError, "Failed processing file")
    }

    pub const fn failed_sending_file() -> Self {
        Self::new(Status::InternalServerError, "Failed sending file")
    }

    pub const fn not_found() -> Self {
        Self::new(Status::NotFound, "Not found")
    }

    pub const fn internal_error() -> Self {
        Self::new(Status::InternalServerError, "Internal server error")
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        (self.status, Json(MessageResponse::new(self.message))).respond_to(request)
    }
}

/// State shared by every handler.
pub struct ServerConfig {
    pub output_dir: PathBuf,
    pub example_path: PathBuf,
    pub generator: Generator,
}

impl ServerConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            example_path: config.example_path.clone(),
            generator: Generator::from_config(&config.renderer),
        }
    }
}
