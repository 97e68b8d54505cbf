// ABOUTME: Builds the deployable archive from a snapshot and ordered path operations.
// ABOUTME: Also runs the configured prerequisite commands that precede every build.

use snafu::{ResultExt, ensure};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::error::{
    ArchiveError, ArchiveRemoveSnafu, ArchiveWriteSnafu, BuildDirSnafu, BuildError,
    InvalidFilenameSnafu, PrerequisiteFailedSnafu, PrerequisiteSpawnSnafu, SnapshotSnafu,
};
use super::format::Format;
use crate::config::PackageConfig;
use crate::process;
use crate::source::SnapshotProvider;

/// A built container on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub path: PathBuf,
    pub filename: String,
    pub format: Format,
}

impl Archive {
    /// Entry names currently in the container.
    pub fn entries(&self) -> Result<Vec<String>, ArchiveError> {
        self.format.handler().list(&self.path)
    }

    /// Whether a file or directory entry named `name` exists.
    pub fn contains(&self, name: &str) -> Result<bool, ArchiveError> {
        let name = name.trim_end_matches('/');
        Ok(self
            .entries()?
            .iter()
            .any(|entry| entry.trim_end_matches('/') == name))
    }
}

/// Composes a snapshot of the tracked tree with include and exclude operations.
pub struct ArchiveBuilder<'a> {
    root: PathBuf,
    build_dir: PathBuf,
    snapshot: &'a dyn SnapshotProvider,
}

impl<'a> ArchiveBuilder<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
        snapshot: &'a dyn SnapshotProvider,
    ) -> Self {
        Self {
            root: root.into(),
            build_dir: build_dir.into(),
            snapshot,
        }
    }

    /// Build `filename` inside the build directory.
    ///
    /// Steps run strictly in order: snapshot, merges (`includes` then
    /// `additional_paths`), then removals (`excludes`). The first failure aborts.
    pub async fn build(
        &self,
        config: &PackageConfig,
        filename: &str,
    ) -> Result<Archive, BuildError> {
        ensure!(
            is_plain_filename(filename),
            InvalidFilenameSnafu { filename }
        );

        std::fs::create_dir_all(&self.build_dir).context(BuildDirSnafu {
            path: &self.build_dir,
        })?;

        let path = self.build_dir.join(filename);
        let format = config.format;
        let handler = format.handler();

        tracing::info!(archive = %path.display(), %format, "exporting snapshot");
        self.snapshot
            .export(format, &path)
            .await
            .context(SnapshotSnafu)?;

        for include in config.merged_paths() {
            tracing::info!(path = include, "adding to archive");
            handler
                .add(&path, &self.root, include)
                .context(ArchiveWriteSnafu { path: include })?;
        }

        for exclude in &config.excludes {
            tracing::info!(path = %exclude, "removing from archive");
            handler
                .remove(&path, exclude)
                .context(ArchiveRemoveSnafu { path: exclude })?;
        }

        Ok(Archive {
            path,
            filename: filename.to_string(),
            format,
        })
    }
}

fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains('/')
        && !filename.contains('\\')
}

/// Run each prerequisite with `sh -c` in `root`, stopping at the first failure.
pub async fn run_prerequisites(root: &Path, commands: &[String]) -> Result<(), BuildError> {
    for command_line in commands {
        tracing::info!(command = %command_line, "running prerequisite");

        let mut command = Command::new("sh");
        command.arg("-c").arg(command_line).current_dir(root);

        let output = process::capture(command)
            .await
            .context(PrerequisiteSpawnSnafu {
                command: command_line,
            })?;

        if !output.success() {
            tracing::error!(command = %command_line, stderr = %output.stderr.trim(), "prerequisite failed");
            return PrerequisiteFailedSnafu {
                command: command_line,
                code: output.code(),
                stderr: output.stderr.trim(),
            }
            .fail();
        }
    }

    Ok(())
}
