use anyhow::{Context, Result};
use clap::Parser;
use cvtex::cli::{generate_from_file, Cli, Command};
use cvtex::installer::install_prerequisites;
use cvtex::{start_web_server, AppConfig, Generator};
use std::fs::OpenOptions;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn init_logging(default_filter: &str, log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(false)
                    .with_span_list(false)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .try_init()
        .context("Failed to initialize logging")
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(cli.command.default_log_filter(), config.log_file.as_deref())?;
    info!("Loaded configuration for environment: {}", AppConfig::environment());

    match cli.command {
        Command::Generate { input, output } => {
            let generator = Generator::from_config(&config.renderer);
            let pdf = generate_from_file(&generator, &input, &output).await?;
            println!("Resume successfully generated on {}", pdf.display());
        }
        Command::Serve => start_web_server(config).await?,
        Command::Install => {
            install_prerequisites().await?;
            println!("Installation process completed");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Whoops. There was an error while executing your CLI: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
