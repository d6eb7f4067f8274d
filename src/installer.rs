// src/installer.rs
//! Installs the LaTeX toolchain the renderer needs

use anyhow::{Context, Result};
use tracing::info;

use crate::core::process::run_command;

/// One package-manager invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStep {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// Steps installing pdflatex and the packages the resume template uses.
pub fn install_plan(os: &str) -> Option<Vec<InstallStep>> {
    match os {
        "linux" => Some(vec![
            InstallStep {
                program: "apt-get",
                args: &["update"],
            },
            InstallStep {
                program: "apt-get",
                args: &[
                    "install",
                    "-y",
                    "texlive-latex-base",
                    "texlive-latex-recommended",
                    "texlive-latex-extra",
                    "texlive-fonts-recommended",
                ],
            },
        ]),
        "macos" => Some(vec![InstallStep {
            program: "brew",
            args: &["install", "--cask", "basictex"],
        }]),
        _ => None,
    }
}

pub async fn install_prerequisites() -> Result<()> {
    let os = std::env::consts::OS;
    let steps = install_plan(os)
        .with_context(|| format!("Automatic installation is not supported on {}", os))?;

    for step in steps {
        info!("Running {} {}", step.program, step.args.join(" "));
        run_command(step.program, step.args, None)
            .await
            .with_context(|| format!("`{} {}` failed", step.program, step.args.join(" ")))?;
    }

    Ok(())
}
