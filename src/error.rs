// ABOUTME: Application-wide error types for stackpack.
// ABOUTME: Uses thiserror and classifies every failure into a fatal error kind.

use std::path::PathBuf;
use thiserror::Error;

use crate::archive::BuildError;
use crate::deploy::DeployError;
use crate::source::SourceError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} environment variable required")]
    MissingEnvVar(&'static str),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("artifact {0} has not been built; run `stackpack build` first")]
    ArtifactNotBuilt(PathBuf),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failure taxonomy. Every kind is fatal to the invoking process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid setting or argument.
    Configuration,
    /// Local or remote state makes the operation unsafe (diverged tree, missing artifact).
    Precondition,
    /// Prerequisite step, snapshot or archive manipulation failed.
    Build,
    /// The remote deployment failed, timed out, or a hook failed.
    Deployment,
    /// An external tool or service could not be reached or answered unexpectedly.
    Remote,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingEnvVar(_)
            | Error::ConfigNotFound(_)
            | Error::InvalidConfig(_)
            | Error::Yaml(_)
            | Error::Io(_) => ErrorKind::Configuration,
            Error::ArtifactNotBuilt(_) => ErrorKind::Precondition,
            Error::Build(_) => ErrorKind::Build,
            Error::Deploy(e) => e.kind(),
            Error::Source(_) | Error::Store(_) => ErrorKind::Remote,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
