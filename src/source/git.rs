// ABOUTME: git command-line implementation of the source traits.
// ABOUTME: Uses rev-parse, archive and fetch --dry-run in the project root.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::{SnapshotProvider, SourceError, UpstreamProbe};
use crate::archive::Format;
use crate::process::{self, CommandOutput};
use crate::types::Revision;

/// Runs `git` inside a working tree.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
    program: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            program: PathBuf::from("git"),
        }
    }

    /// Use a different git binary.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(args).current_dir(&self.root);
        command
    }

    /// Run git and require a zero exit.
    async fn run(&self, args: &[&str]) -> Result<CommandOutput, SourceError> {
        let command = self.command(args);
        let line = process::describe(&command);
        let output = process::capture(command).await?;

        if !output.success() {
            return Err(SourceError::Failed {
                command: line,
                code: output.code(),
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl SnapshotProvider for GitCli {
    async fn revision(&self) -> Result<Revision, SourceError> {
        let output = self.run(&["rev-parse", "HEAD"]).await?;
        Ok(Revision::parse(&output.stdout)?)
    }

    async fn export(&self, format: Format, dest: &Path) -> Result<(), SourceError> {
        let dest = dest.to_string_lossy().into_owned();
        self.run(&[
            "archive",
            "--format",
            format.extension(),
            "--output",
            dest.as_str(),
            "HEAD",
        ])
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UpstreamProbe for GitCli {
    async fn pending_changes(&self) -> Result<String, SourceError> {
        // fetch reports ref updates on stderr, so both streams count.
        let output = self.run(&["fetch", "--dry-run"]).await?;
        Ok(output.combined())
    }
}
