pub mod artifact;
pub mod cli;
pub mod config;
pub mod core;
pub mod generator;
pub mod installer;
pub mod types;
pub mod web;

pub use artifact::{Artifact, PartialArtifact};
pub use config::AppConfig;
pub use generator::{GenerateError, GenerateErrorKind, Generator, Renderer};
pub use types::User;
pub use web::start_web_server;
