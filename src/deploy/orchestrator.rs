// ABOUTME: Drives a deployment through every state with injected collaborators.
// ABOUTME: Used by the deploy command and by tests with fakes.

use crate::fleet::DeploymentClient;
use crate::hooks::HookTable;
use crate::naming::NamingResolver;
use crate::source::UpstreamProbe;
use crate::store::ArtifactStore;

use super::deployment::{DeployInput, Deployment, DeploymentReport};
use super::error::DeployError;
use super::poll::{Clock, DeployProgress, PollSettings};
use super::transitions::Settled;

/// Everything a deploy attempt talks to. The hook table is borrowed for the
/// whole run, so bindings cannot change once dispatch starts.
pub struct Orchestrator<'a> {
    pub upstream: &'a dyn UpstreamProbe,
    pub store: &'a dyn ArtifactStore,
    pub fleet: &'a dyn DeploymentClient,
    pub hooks: &'a HookTable,
    pub clock: &'a dyn Clock,
    pub progress: &'a dyn DeployProgress,
    pub settings: PollSettings,
}

impl Orchestrator<'_> {
    pub async fn run(
        &self,
        input: DeployInput,
        naming: &NamingResolver,
    ) -> Result<DeploymentReport, DeployError> {
        // Missing names never reach the network.
        input.target()?;

        let deployment = Deployment::new(input).preflight(self.upstream).await?;
        self.progress.step("Local repository is in sync with upstream");

        let deployment = deployment
            .validate()?
            .confirm_artifact(naming, self.store)
            .await?;
        self.progress.step(&format!(
            "Artifact found at {}",
            deployment.state().request().artifact_url
        ));

        let deployment = deployment.trigger(self.hooks, self.fleet).await?;
        self.progress.step(&format!(
            "Deployment {} triggered",
            deployment.state().deployment_id()
        ));

        match deployment
            .wait(self.fleet, self.clock, self.settings, self.progress)
            .await?
        {
            Settled::Succeeded(deployment) => deployment.finish(self.hooks).await,
            Settled::Failed(deployment) => Err(deployment.fail(self.hooks).await),
        }
    }
}
