// ABOUTME: Fleet-deployment service interface: trigger a deployment and read its status.
// ABOUTME: Status is reduced to running, successful or failed.

mod opsworks;

pub use opsworks::OpsWorksCli;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::aws::AwsError;
use crate::types::DeploymentId;

/// What to deploy where. Built once per deploy invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentRequest {
    pub app_name: String,
    pub stack_name: String,
    pub artifact_url: String,
}

/// The externally observable facets of a remote deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Running,
    Successful,
    Failed,
}

impl DeploymentStatus {
    /// Map the service's status string. Anything unrecognized is still in progress.
    pub fn from_remote(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "successful" => DeploymentStatus::Successful,
            "failed" => DeploymentStatus::Failed,
            _ => DeploymentStatus::Running,
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, DeploymentStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Running => "running",
            DeploymentStatus::Successful => "successful",
            DeploymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    #[error("fleet service request failed: {0}")]
    Aws(#[from] AwsError),

    #[error("stack {0:?} not found")]
    StackNotFound(String),

    #[error("app {app:?} not found in stack {stack:?}")]
    AppNotFound { app: String, stack: String },

    #[error("deployment {0} not found")]
    DeploymentNotFound(DeploymentId),
}

/// Remote service that performs deployments onto target infrastructure.
#[async_trait]
pub trait DeploymentClient: Send + Sync {
    /// Start a deployment and return its handle.
    async fn trigger(&self, request: &DeploymentRequest) -> Result<DeploymentId, FleetError>;

    async fn status(&self, deployment: &DeploymentId) -> Result<DeploymentStatus, FleetError>;
}
