// ABOUTME: AWS OpsWorks deployment client backed by the aws CLI.
// ABOUTME: Resolves stack and app by name, repoints the app source, and creates a deploy.

use async_trait::async_trait;
use serde::Deserialize;

use super::{DeploymentClient, DeploymentRequest, DeploymentStatus, FleetError};
use crate::aws::AwsCli;
use crate::types::{AppId, DeploymentId, StackId};

#[derive(Debug, Clone)]
pub struct OpsWorksCli {
    aws: AwsCli,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStacks {
    stacks: Vec<Stack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Stack {
    stack_id: StackId,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeApps {
    apps: Vec<App>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct App {
    app_id: AppId,
    name: String,
    #[serde(default)]
    shortname: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateDeployment {
    deployment_id: DeploymentId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeDeployments {
    deployments: Vec<RemoteDeployment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteDeployment {
    deployment_id: DeploymentId,
    status: String,
}

fn find_stack(stacks: Vec<Stack>, name: &str) -> Result<StackId, FleetError> {
    stacks
        .into_iter()
        .find(|stack| stack.name == name)
        .map(|stack| stack.stack_id)
        .ok_or_else(|| FleetError::StackNotFound(name.to_string()))
}

fn find_app(apps: Vec<App>, name: &str, stack: &str) -> Result<AppId, FleetError> {
    apps.into_iter()
        .find(|app| app.name == name || app.shortname.as_deref() == Some(name))
        .map(|app| app.app_id)
        .ok_or_else(|| FleetError::AppNotFound {
            app: name.to_string(),
            stack: stack.to_string(),
        })
}

impl OpsWorksCli {
    pub fn new(aws: AwsCli) -> Self {
        Self { aws }
    }

    async fn stack_id(&self, name: &str) -> Result<StackId, FleetError> {
        let response: DescribeStacks = self.aws.json(&["opsworks", "describe-stacks"]).await?;
        find_stack(response.stacks, name)
    }

    async fn app_id(&self, stack_id: &StackId, name: &str, stack: &str) -> Result<AppId, FleetError> {
        let response: DescribeApps = self
            .aws
            .json(&["opsworks", "describe-apps", "--stack-id", stack_id.as_str()])
            .await?;
        find_app(response.apps, name, stack)
    }
}

#[async_trait]
impl DeploymentClient for OpsWorksCli {
    async fn trigger(&self, request: &DeploymentRequest) -> Result<DeploymentId, FleetError> {
        let stack_id = self.stack_id(&request.stack_name).await?;
        let app_id = self
            .app_id(&stack_id, &request.app_name, &request.stack_name)
            .await?;
        tracing::debug!(%stack_id, %app_id, "resolved OpsWorks identifiers");

        let source = serde_json::json!({ "Type": "archive", "Url": request.artifact_url }).to_string();
        self.aws
            .run(&[
                "opsworks",
                "update-app",
                "--app-id",
                app_id.as_str(),
                "--app-source",
                source.as_str(),
            ])
            .await?;

        let command = serde_json::json!({ "Name": "deploy" }).to_string();
        let response: CreateDeployment = self
            .aws
            .json(&[
                "opsworks",
                "create-deployment",
                "--stack-id",
                stack_id.as_str(),
                "--app-id",
                app_id.as_str(),
                "--command",
                command.as_str(),
            ])
            .await?;

        tracing::info!(deployment = %response.deployment_id, "deployment created");
        Ok(response.deployment_id)
    }

    async fn status(&self, deployment: &DeploymentId) -> Result<DeploymentStatus, FleetError> {
        let response: DescribeDeployments = self
            .aws
            .json(&[
                "opsworks",
                "describe-deployments",
                "--deployment-ids",
                deployment.as_str(),
            ])
            .await?;

        response
            .deployments
            .into_iter()
            .find(|d| &d.deployment_id == deployment)
            .map(|d| DeploymentStatus::from_remote(&d.status))
            .ok_or_else(|| FleetError::DeploymentNotFound(deployment.clone()))
    }
}
