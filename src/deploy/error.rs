// ABOUTME: Error types for deployment operations.
// ABOUTME: Each variant maps onto the crate-wide error kind taxonomy.

use std::time::Duration;

use crate::error::ErrorKind;
use crate::fleet::FleetError;
use crate::hooks::HookError;
use crate::source::PreflightError;
use crate::store::StoreError;
use crate::types::DeploymentId;

/// Errors that end a deploy attempt.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(transparent)]
    Preflight(#[from] PreflightError),

    /// A required deploy argument was absent.
    #[error("{0} is required")]
    MissingArgument(&'static str),

    #[error("{0}")]
    Configuration(String),

    #[error(
        "artifact {url} doesn't seem to exist; run `stackpack build` and `stackpack upload` before deploying"
    )]
    ArtifactMissing { url: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("deployment {deployment_id} failed; check the OpsWorks console for details")]
    Failed { deployment_id: DeploymentId },

    #[error("deployment {deployment_id} did not finish within {elapsed:?}")]
    Timeout {
        deployment_id: DeploymentId,
        elapsed: Duration,
    },
}

impl DeployError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::Preflight(PreflightError::Diverged { .. }) => ErrorKind::Precondition,
            DeployError::Preflight(PreflightError::Source(_)) => ErrorKind::Remote,
            DeployError::MissingArgument(_) | DeployError::Configuration(_) => {
                ErrorKind::Configuration
            }
            DeployError::ArtifactMissing { .. } => ErrorKind::Precondition,
            DeployError::Store(_) | DeployError::Fleet(_) => ErrorKind::Remote,
            DeployError::Hook(_) | DeployError::Failed { .. } | DeployError::Timeout { .. } => {
                ErrorKind::Deployment
            }
        }
    }
}
