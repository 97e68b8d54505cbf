// ABOUTME: Version-control collaborators: snapshot export and upstream probing.
// ABOUTME: Narrow async traits keep the build and deploy logic testable without git.

mod git;
mod preflight;

pub use git::GitCli;
pub use preflight::{PreflightError, assert_synchronized};

use async_trait::async_trait;
use std::path::Path;

use crate::archive::Format;
use crate::process::SpawnError;
use crate::types::{Revision, RevisionError};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("`{command}` failed with exit code {code}: {stderr}")]
    Failed {
        command: String,
        code: String,
        stderr: String,
    },

    #[error("unexpected revision from git: {0}")]
    Revision(#[from] RevisionError),
}

/// Produces the base snapshot of the tracked tree.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// The currently checked-out revision.
    async fn revision(&self) -> Result<Revision, SourceError>;

    /// Write the checked-out revision to `dest` as a fresh container in `format`.
    async fn export(&self, format: Format, dest: &Path) -> Result<(), SourceError>;
}

/// Reports whether the upstream has changes the local tree lacks.
#[async_trait]
pub trait UpstreamProbe: Send + Sync {
    /// Output of a dry-run fetch. Empty when local and upstream agree.
    async fn pending_changes(&self) -> Result<String, SourceError>;
}
