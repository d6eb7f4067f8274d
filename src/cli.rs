// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::generator::Generator;
use crate::types::user::User;

#[derive(Parser)]
#[command(name = "cvtex")]
#[command(about = "Generate LaTeX resumes from JSON, from the terminal or over HTTP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to $CVTEX_CONFIG, then ./config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate resume directly using terminal
    #[command(alias = "gen")]
    Generate {
        /// Path for the JSON input file
        #[arg(short, long)]
        input: PathBuf,

        /// Path prefix for the output pdf and latex files
        #[arg(short, long, default_value = "app")]
        output: PathBuf,
    },
    /// Start the HTTP API server
    Serve,
    /// Install software dependencies
    #[command(alias = "ins")]
    Install,
}

impl Command {
    /// Default log filter when RUST_LOG is unset.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Command::Serve => "cvtex=info,rocket=warn",
            _ => "cvtex=warn",
        }
    }
}

/// Read and decode a resume JSON file.
pub async fn read_user(input: &Path) -> Result<User> {
    let raw = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("Failed to decode JSON from {}", input.display()))
}

/// Generate a resume from `input`, leaving the PDF at `<output>.pdf`.
///
/// Files left by a failed run are kept so the renderer log can be inspected.
pub async fn generate_from_file(
    generator: &Generator,
    input: &Path,
    output: &Path,
) -> Result<PathBuf> {
    let user = read_user(input).await?;

    match generator.create_file(&user, output).await {
        Ok(artifact) => {
            info!(input = %input.display(), pdf = %artifact.pdf_path().display(), "Generated resume");
            Ok(artifact.pdf_path())
        }
        Err(e) => {
            let log = e
                .partial
                .as_ref()
                .and_then(|partial| partial.log_path())
                .map(|log| format!(" (see {})", log.display()))
                .unwrap_or_default();
            Err(anyhow::Error::new(e).context(format!("Failed to generate resume{}", log)))
        }
    }
}
