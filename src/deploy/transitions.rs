// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use chrono::Utc;
use std::time::Duration;

use crate::fleet::{DeploymentClient, DeploymentRequest, DeploymentStatus};
use crate::hooks::{HookContext, HookPoint, HookTable};
use crate::naming::NamingResolver;
use crate::source::{self, UpstreamProbe};
use crate::store::ArtifactStore;
use crate::types::DeploymentId;

use super::deployment::{Deployment, DeploymentReport};
use super::error::DeployError;
use super::poll::{Clock, DeployProgress, PollSettings};
use super::state::{
    ArtifactConfirmed, FailureReason, Failed, Idle, PreflightChecked, Succeeded, Triggered,
    Validated,
};

/// Where polling ended up.
#[derive(Debug)]
pub enum Settled {
    Succeeded(Deployment<Succeeded>),
    Failed(Deployment<Failed>),
}

impl<S> Deployment<S> {
    fn hook_context(
        &self,
        request: &DeploymentRequest,
        deployment_id: Option<&DeploymentId>,
        status: Option<DeploymentStatus>,
    ) -> HookContext {
        HookContext {
            app: request.app_name.clone(),
            stack: request.stack_name.clone(),
            artifact_url: request.artifact_url.clone(),
            revision: self.input.revision.clone(),
            deployment_id: deployment_id.cloned(),
            status,
        }
    }
}

impl Deployment<Idle> {
    /// Refuse to go further when upstream has changes the local tree lacks.
    pub async fn preflight(
        self,
        probe: &dyn UpstreamProbe,
    ) -> Result<Deployment<PreflightChecked>, DeployError> {
        source::assert_synchronized(probe).await?;
        Ok(self.transition(PreflightChecked))
    }
}

impl Deployment<PreflightChecked> {
    /// Require both target identifiers.
    pub fn validate(self) -> Result<Deployment<Validated>, DeployError> {
        let (app_name, stack_name) = self.input.target()?;
        tracing::info!(app = %app_name, stack = %stack_name, "deploy target validated");
        Ok(self.transition(Validated {
            app_name,
            stack_name,
        }))
    }
}

impl Deployment<Validated> {
    /// Check that the artifact was uploaded before asking anyone to deploy it.
    pub async fn confirm_artifact(
        self,
        naming: &NamingResolver,
        store: &dyn ArtifactStore,
    ) -> Result<Deployment<ArtifactConfirmed>, DeployError> {
        let location = naming
            .artifact_location(&self.input.filename)
            .map_err(|e| DeployError::Configuration(e.to_string()))?;
        let url = location.public_url();

        if !store.exists(&location).await? {
            return Err(DeployError::ArtifactMissing { url });
        }
        tracing::info!(%location, "artifact confirmed");

        let Validated {
            app_name,
            stack_name,
        } = self.state.clone();
        Ok(self.transition(ArtifactConfirmed {
            request: DeploymentRequest {
                app_name,
                stack_name,
                artifact_url: url,
            },
        }))
    }
}

impl Deployment<ArtifactConfirmed> {
    /// Run the before-deploy hook, then hand the request to the fleet service.
    pub async fn trigger(
        self,
        hooks: &HookTable,
        fleet: &dyn DeploymentClient,
    ) -> Result<Deployment<Triggered>, DeployError> {
        let request = self.state.request.clone();
        let context = self.hook_context(&request, None, None);
        hooks.invoke(HookPoint::BeforeDeploy, &context).await?;

        let deployment_id = fleet.trigger(&request).await?;
        tracing::info!(deployment = %deployment_id, "deployment triggered");

        Ok(self.transition(Triggered {
            request,
            deployment_id,
        }))
    }
}

impl Deployment<Triggered> {
    /// Poll until the deployment finishes, or the timeout (if any) runs out.
    ///
    /// Each iteration emits one tick, queries status, and sleeps only if the
    /// deployment is still running. Status query errors end the attempt
    /// without reaching a terminal state.
    pub async fn wait(
        self,
        fleet: &dyn DeploymentClient,
        clock: &dyn Clock,
        settings: PollSettings,
        progress: &dyn DeployProgress,
    ) -> Result<Settled, DeployError> {
        progress.poll_started(&self.input.revision);

        let mut polls: u32 = 0;
        let mut elapsed = Duration::ZERO;

        let status = loop {
            progress.poll_tick();
            polls += 1;

            let status = fleet.status(&self.state.deployment_id).await?;
            tracing::debug!(deployment = %self.state.deployment_id, %status, polls, "polled status");

            if status.is_finished() {
                break status;
            }

            if settings.timeout.is_some_and(|limit| elapsed >= limit) {
                progress.poll_finished(status);
                tracing::warn!(deployment = %self.state.deployment_id, ?elapsed, "polling timed out");
                return Ok(self.settle_failed(FailureReason::TimedOut { elapsed }, polls));
            }

            clock.sleep(settings.interval).await;
            elapsed += settings.interval;
        };

        progress.poll_finished(status);

        Ok(match status {
            DeploymentStatus::Successful => {
                let Triggered {
                    request,
                    deployment_id,
                } = self.state.clone();
                Settled::Succeeded(self.transition(Succeeded {
                    request,
                    deployment_id,
                    polls,
                }))
            }
            _ => self.settle_failed(FailureReason::Remote, polls),
        })
    }

    fn settle_failed(self, reason: FailureReason, polls: u32) -> Settled {
        let Triggered {
            request,
            deployment_id,
        } = self.state.clone();
        Settled::Failed(self.transition(Failed {
            request,
            deployment_id,
            reason,
            polls,
        }))
    }
}

impl Deployment<Succeeded> {
    /// Run the on-finished hook and summarize.
    pub async fn finish(self, hooks: &HookTable) -> Result<DeploymentReport, DeployError> {
        let state = &self.state;
        let context = self.hook_context(
            &state.request,
            Some(&state.deployment_id),
            Some(DeploymentStatus::Successful),
        );
        hooks.invoke(HookPoint::OnFinished, &context).await?;

        tracing::info!(deployment = %state.deployment_id, "deployment succeeded");

        Ok(DeploymentReport {
            deployment_id: state.deployment_id.clone(),
            app: state.request.app_name.clone(),
            stack: state.request.stack_name.clone(),
            artifact_url: state.request.artifact_url.clone(),
            revision: self.input.revision.clone(),
            status: DeploymentStatus::Successful,
            polls: state.polls,
            started_at: self.started_at,
            finished_at: Utc::now(),
        })
    }
}

impl Deployment<Failed> {
    /// Run the on-failure hook and produce the error that ends the attempt.
    ///
    /// A failing on-failure hook is logged; the deployment failure is what
    /// gets reported.
    pub async fn fail(self, hooks: &HookTable) -> DeployError {
        let state = &self.state;
        let context = self.hook_context(
            &state.request,
            Some(&state.deployment_id),
            Some(DeploymentStatus::Failed),
        );
        if let Err(e) = hooks.invoke(HookPoint::OnFailure, &context).await {
            tracing::warn!(error = %e, "on-failure hook did not complete");
        }

        let deployment_id = state.deployment_id.clone();
        match state.reason {
            FailureReason::Remote => {
                tracing::info!(deployment = %deployment_id, polls = state.polls, "deployment failed");
                DeployError::Failed { deployment_id }
            }
            FailureReason::TimedOut { elapsed } => DeployError::Timeout {
                deployment_id,
                elapsed,
            },
        }
    }
}
