// ABOUTME: Thin wrapper for running external commands with captured output.
// ABOUTME: Shared by git, aws, prerequisite and hook invocations.

use std::fmt::Write as _;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// Failure to start a command at all (missing binary, permissions).
#[derive(Debug, thiserror::Error)]
#[error("failed to run {program}: {source}")]
pub struct SpawnError {
    pub program: String,
    #[source]
    pub source: std::io::Error,
}

/// Captured result of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code for messages; signals render as "signal".
    pub fn code(&self) -> String {
        self.status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string())
    }

    /// Stdout followed by stderr, trimmed.
    pub fn combined(&self) -> String {
        let mut text = String::new();
        for part in [self.stdout.trim(), self.stderr.trim()] {
            if part.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(part);
        }
        text
    }
}

/// Render a command line for logs and error messages.
pub fn describe(command: &Command) -> String {
    let std = command.as_std();
    let mut line = std.get_program().to_string_lossy().into_owned();
    for arg in std.get_args() {
        let _ = write!(line, " {}", arg.to_string_lossy());
    }
    line
}

/// Run a command to completion, capturing stdout and stderr.
///
/// A non-zero exit is not an error here; callers decide what it means.
pub async fn capture(mut command: Command) -> Result<CommandOutput, SpawnError> {
    let line = describe(&command);
    let program = command.as_std().get_program().to_string_lossy().into_owned();
    tracing::debug!(command = %line, "running");

    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| SpawnError { program, source })?;

    let output = CommandOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !output.success() {
        tracing::debug!(command = %line, code = %output.code(), "command exited unsuccessfully");
    }

    Ok(output)
}
