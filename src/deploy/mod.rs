// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Preflight, validate, confirm artifact, trigger, poll, then terminal hooks.

mod deployment;
mod error;
mod orchestrator;
mod poll;
mod state;
mod transitions;

pub use deployment::{DeployInput, Deployment, DeploymentReport};
pub use error::DeployError;
pub use orchestrator::Orchestrator;
pub use poll::{Clock, DeployProgress, PollSettings, Silent, TokioClock};
pub use state::{
    ArtifactConfirmed, FailureReason, Failed, Idle, PreflightChecked, Succeeded, Triggered,
    Validated,
};
pub use transitions::Settled;
