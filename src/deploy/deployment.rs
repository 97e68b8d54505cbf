// ABOUTME: Generic deployment struct parameterized by state.
// ABOUTME: Holds the invocation inputs shared by every state, plus the final report type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fleet::DeploymentStatus;
use crate::types::{DeploymentId, Revision};

use super::error::DeployError;
use super::state::Idle;

/// Inputs to one deploy invocation, as given on the command line.
#[derive(Debug, Clone)]
pub struct DeployInput {
    pub app_name: Option<String>,
    pub stack_name: Option<String>,
    /// Artifact filename within the package folder.
    pub filename: String,
    pub revision: Revision,
}

impl DeployInput {
    /// App and stack names, trimmed. Blank counts as missing.
    pub fn target(&self) -> Result<(String, String), DeployError> {
        let app_name = required(&self.app_name, "app_name")?;
        let stack_name = required(&self.stack_name, "stack_name")?;
        Ok((app_name, stack_name))
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, DeployError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(DeployError::MissingArgument(name))
}

/// A deployment in progress, parameterized by its current state.
///
/// Transitions consume the deployment, so a state can only be left once and
/// data such as the deployment id exists only in states that have it.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) input: DeployInput,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) state: S,
}

impl Deployment<Idle> {
    pub fn new(input: DeployInput) -> Self {
        Deployment {
            input,
            started_at: Utc::now(),
            state: Idle,
        }
    }
}

impl<S> Deployment<S> {
    pub fn revision(&self) -> &Revision {
        &self.input.revision
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub(crate) fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            input: self.input,
            started_at: self.started_at,
            state,
        }
    }
}

/// Summary of a finished deployment.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub deployment_id: DeploymentId,
    pub app: String,
    pub stack: String,
    pub artifact_url: String,
    pub revision: Revision,
    pub status: DeploymentStatus,
    pub polls: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
