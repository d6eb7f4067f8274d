// src/core/process.rs
//! Scoped subprocess invocation with captured output and an optional deadline

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured streams of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Failed {
        program: String,
        status: ExitStatus,
        output: CommandOutput,
    },

    #[error("`{program}` did not finish within {}s and was killed", .timeout.as_secs_f32())]
    Timeout { program: String, timeout: Duration },
}

impl CommandError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Output captured before the command failed, when there is any.
    pub fn output(&self) -> Option<&CommandOutput> {
        match self {
            Self::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Run `program` with `args`, capturing stdout and stderr.
///
/// A non-zero exit is returned as [`CommandError::Failed`] carrying whatever
/// the child printed. The `timeout` covers both the exit and the end of its
/// output: a descendant still holding the pipes open counts as running. At
/// the deadline the direct child is killed and reaped before
/// [`CommandError::Timeout`] is returned. Its descendants are not signalled,
/// only detached from the pipes.
pub async fn run_command<I, S>(
    program: impl AsRef<Path>,
    args: I,
    timeout: Option<Duration>,
) -> Result<CommandOutput, CommandError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program_path = program.as_ref();
    let program_name = program_path.display().to_string();

    let mut cmd = Command::new(program_path);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(program = %program_name, "Spawning command");

    let mut child = cmd.spawn().map_err(|source| CommandError::Spawn {
        program: program_name.clone(),
        source,
    })?;

    let stdout_task = tokio::spawn(drain(child.stdout.take()));
    let stderr_task = tokio::spawn(drain(child.stderr.take()));
    let drains = [stdout_task.abort_handle(), stderr_task.abort_handle()];

    let finish = async {
        let waited = child.wait().await;
        let output = CommandOutput {
            stdout: stdout_task.await.unwrap_or_default(),
            stderr: stderr_task.await.unwrap_or_default(),
        };
        (waited, output)
    };

    let finished = match timeout {
        Some(limit) => tokio::time::timeout(limit, finish).await.ok(),
        None => Some(finish.await),
    };

    let Some((waited, output)) = finished else {
        for handle in &drains {
            handle.abort();
        }
        if let Ok(None) = child.try_wait() {
            if let Err(e) = child.kill().await {
                warn!(program = %program_name, error = %e, "Failed to kill timed out command");
            }
        }
        return Err(CommandError::Timeout {
            program: program_name,
            timeout: timeout.unwrap_or_default(),
        });
    };

    let status = waited.map_err(|source| CommandError::Wait {
        program: program_name.clone(),
        source,
    })?;

    if !status.success() {
        return Err(CommandError::Failed {
            program: program_name,
            status,
            output,
        });
    }

    debug!(program = %program_name, "Command finished successfully");
    Ok(output)
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(e) = pipe.read_to_end(&mut buf).await {
            warn!(error = %e, "Failed to read command output");
        }
    }
    buf
}
