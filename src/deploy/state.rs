// ABOUTME: Deployment state types for the type state pattern.
// ABOUTME: Each state carries only the data that exists once it is reached.

use std::time::Duration;

use crate::fleet::DeploymentRequest;
use crate::types::DeploymentId;

/// Initial state: inputs gathered, nothing checked.
/// Available actions: `preflight()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

/// Local tree matches upstream.
/// Available actions: `validate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct PreflightChecked;

/// App and stack names are present.
/// Available actions: `confirm_artifact()`
#[derive(Debug, Clone)]
pub struct Validated {
    pub(crate) app_name: String,
    pub(crate) stack_name: String,
}

/// Artifact exists in the store; the request is fully formed.
/// Available actions: `trigger()`
#[derive(Debug, Clone)]
pub struct ArtifactConfirmed {
    pub(crate) request: DeploymentRequest,
}

impl ArtifactConfirmed {
    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }
}

/// The fleet service accepted the deployment.
/// Available actions: `wait()`
#[derive(Debug, Clone)]
pub struct Triggered {
    pub(crate) request: DeploymentRequest,
    pub(crate) deployment_id: DeploymentId,
}

impl Triggered {
    pub fn deployment_id(&self) -> &DeploymentId {
        &self.deployment_id
    }
}

/// Terminal: the deployment reported success.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Succeeded {
    pub(crate) request: DeploymentRequest,
    pub(crate) deployment_id: DeploymentId,
    pub(crate) polls: u32,
}

/// Why a deployment ended badly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The fleet service reported failure.
    Remote,
    /// Polling exceeded the configured timeout.
    TimedOut { elapsed: Duration },
}

/// Terminal: the deployment failed or never finished in time.
/// Available actions: `fail()`
#[derive(Debug, Clone)]
pub struct Failed {
    pub(crate) request: DeploymentRequest,
    pub(crate) deployment_id: DeploymentId,
    pub(crate) reason: FailureReason,
    pub(crate) polls: u32,
}
