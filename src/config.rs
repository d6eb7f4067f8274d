// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::fs_ops::normalize_path;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the server writes per-request artifacts.
    pub output_dir: PathBuf,
    /// JSON document served by the example endpoint.
    pub example_path: PathBuf,
    /// Extra JSON log sink, truncated on startup.
    pub log_file: Option<PathBuf>,
    pub renderer: RendererConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub program: PathBuf,
    /// Arguments placed before the per-job ones.
    pub args: Vec<String>,
    /// `0` disables the deadline.
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            example_path: PathBuf::from("assets/user.json"),
            log_file: None,
            renderer: RendererConfig::default(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("pdflatex"),
            args: vec![
                "-interaction=nonstopmode".to_string(),
                "-halt-on-error".to_string(),
            ],
            timeout_secs: 60,
        }
    }
}

impl RendererConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: AppConfig,
    #[serde(default)]
    production: AppConfig,
}

impl AppConfig {
    /// Load configuration based on environment
    ///
    /// An explicit path (flag or `CVTEX_CONFIG`) must exist; the default
    /// `config.yaml` is optional and built-in defaults apply without it.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let environment = Self::environment();
        let from_env = std::env::var_os("CVTEX_CONFIG").map(PathBuf::from);
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;

        let config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load_from_file(&path, &environment)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from_file(&path, &environment)?
                } else {
                    Self::default()
                }
            }
        };

        Ok(config.resolve_paths(&base_dir))
    }

    /// Name of the config section in use: `CVTEX_ENV`, then `ENVIRONMENT`.
    pub fn environment() -> String {
        std::env::var("CVTEX_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    /// Make paths absolute
    pub fn resolve_paths(mut self, base_dir: &Path) -> Self {
        self.output_dir = normalize_path(base_dir, &self.output_dir);
        self.example_path = normalize_path(base_dir, &self.example_path);
        self.log_file = self.log_file.map(|file| normalize_path(base_dir, &file));
        self
    }
}
