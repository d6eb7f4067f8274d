// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use anyhow::Result;
use rocket::data::{Data, Limits};
use rocket::http::{ContentType, Method, Status};
use rocket::route::{Handler, Outcome, Route};
use rocket::{catchers, get, post, routes, Build, Request, Rocket, State};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::core::fs_ops;

pub const API_BASE: &str = "/api";

#[post("/generate", data = "<body>")]
pub async fn generate_cv(
    body: Data<'_>,
    limits: &Limits,
    config: &State<ServerConfig>,
) -> Result<PdfResponse, ApiError> {
    handlers::generate_cv_handler(body, limits, config).await
}

#[get("/example")]
pub async fn example(config: &State<ServerConfig>) -> Result<(ContentType, Vec<u8>), ApiError> {
    handlers::example_handler(config).await
}

#[get("/health")]
pub async fn health(config: &State<ServerConfig>) -> Result<Status, ApiError> {
    handlers::health_handler(config).await
}

/// Answers 405 for every method a path does not accept.
#[derive(Clone, Copy)]
pub struct MethodNotAllowed {
    plain_text: bool,
}

impl MethodNotAllowed {
    const METHODS: [Method; 9] = [
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Patch,
        Method::Options,
        Method::Trace,
        Method::Connect,
    ];

    pub fn json() -> Self {
        Self { plain_text: false }
    }

    pub fn plain_text() -> Self {
        Self { plain_text: true }
    }

    /// Routes for `path` covering every method except `allowed`. HEAD is
    /// left to Rocket's GET fallback when GET is the allowed method.
    pub fn routes(self, path: &str, allowed: Method) -> Vec<Route> {
        Self::METHODS
            .into_iter()
            .filter(|method| *method != allowed)
            .filter(|method| !(allowed == Method::Get && *method == Method::Head))
            .map(|method| Route::new(method, path, self))
            .collect()
    }
}

#[rocket::async_trait]
impl Handler for MethodNotAllowed {
    async fn handle<'r>(&self, request: &'r Request<'_>, _data: Data<'r>) -> Outcome<'r> {
        if self.plain_text {
            Outcome::from(request, (Status::MethodNotAllowed, "Method not allowed"))
        } else {
            Outcome::from(request, ApiError::method_not_allowed())
        }
    }
}

// Error catchers
#[rocket::catch(404)]
pub fn not_found() -> ApiError {
    ApiError::not_found()
}

#[rocket::catch(500)]
pub fn internal_error() -> ApiError {
    ApiError::internal_error()
}

/// Assemble the server without launching it.
pub fn build_rocket(server_config: ServerConfig) -> Rocket<Build> {
    let mut rejections = MethodNotAllowed::json().routes("/generate", Method::Post);
    rejections.extend(MethodNotAllowed::json().routes("/example", Method::Get));
    rejections.extend(MethodNotAllowed::plain_text().routes("/health", Method::Get));

    rocket::build()
        .manage(server_config)
        .register("/", catchers![not_found, internal_error])
        .mount(API_BASE, routes![generate_cv, example, health])
        .mount(API_BASE, rejections)
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    fs_ops::ensure_dir_exists(&config.output_dir).await?;

    info!("Starting cvtex API server");
    info!("Output directory: {}", config.output_dir.display());
    info!("Example file: {}", config.example_path.display());
    info!("Renderer: {}", config.renderer.program.display());

    if let Err(e) = build_rocket(ServerConfig::from_app_config(&config))
        .launch()
        .await
    {
        error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
