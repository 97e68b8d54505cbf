// ABOUTME: Error types for archive manipulation and the build task.
// ABOUTME: BuildError uses SNAFU context selectors to name the failing step.

use snafu::Snafu;
use std::path::PathBuf;

use super::entry::PathError;
use crate::process::SpawnError;
use crate::source::SourceError;

/// Low-level failure while reading or rewriting a container.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("path {0} does not exist in the project tree")]
    MissingPath(String),

    #[error(transparent)]
    InvalidPath(#[from] PathError),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of the build task. Never retried.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BuildError {
    #[snafu(display("prerequisite `{command}` could not be started: {source}"))]
    PrerequisiteSpawn { command: String, source: SpawnError },

    #[snafu(display("prerequisite `{command}` failed with exit code {code}"))]
    PrerequisiteFailed {
        command: String,
        code: String,
        stderr: String,
    },

    #[snafu(display("invalid archive filename {filename:?}"))]
    InvalidFilename { filename: String },

    #[snafu(display("cannot create build directory {}: {source}", path.display()))]
    BuildDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to snapshot tracked tree: {source}"))]
    Snapshot { source: SourceError },

    #[snafu(display("failed to add {path} to archive: {source}"))]
    ArchiveWrite { path: String, source: ArchiveError },

    #[snafu(display("failed to remove {path} from archive: {source}"))]
    ArchiveRemove { path: String, source: ArchiveError },
}
