// ABOUTME: Runner for the aws command-line client with JSON output.
// ABOUTME: Credentials and profiles come from the CLI's own configuration.

use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tokio::process::Command;

use crate::process::{self, CommandOutput, SpawnError};

#[derive(Debug, thiserror::Error)]
pub enum AwsError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("aws {operation} failed with exit code {code}: {stderr}")]
    Failed {
        operation: String,
        code: String,
        stderr: String,
    },

    #[error("unexpected response from aws {operation}: {source}")]
    Parse {
        operation: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Invokes `aws --region <region> --output json ...`.
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: PathBuf,
    region: String,
}

impl AwsCli {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            program: PathBuf::from("aws"),
            region: region.into(),
        }
    }

    /// Use a different aws binary.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["--region", self.region.as_str(), "--output", "json"])
            .args(args);
        command
    }

    /// Run and return the captured output whatever the exit status.
    pub async fn output(&self, args: &[&str]) -> Result<CommandOutput, AwsError> {
        Ok(process::capture(self.command(args)).await?)
    }

    /// Run and require success, returning stdout.
    pub async fn run(&self, args: &[&str]) -> Result<String, AwsError> {
        let output = self.output(args).await?;
        if !output.success() {
            return Err(AwsError::Failed {
                operation: operation(args),
                code: output.code(),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    /// Run, require success, and decode stdout as JSON.
    pub async fn json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, AwsError> {
        let stdout = self.run(args).await?;
        serde_json::from_str(&stdout).map_err(|source| AwsError::Parse {
            operation: operation(args),
            source,
        })
    }
}

/// Service and action, e.g. "opsworks create-deployment".
pub(crate) fn operation(args: &[&str]) -> String {
    args.iter().take(2).copied().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_is_service_and_action() {
        assert_eq!(
            operation(&["opsworks", "describe-deployments", "--deployment-ids", "d-1"]),
            "opsworks describe-deployments"
        );
    }

    #[tokio::test]
    async fn non_zero_exit_is_failed() {
        let aws = AwsCli::new("us-east-1").program("false");
        let err = aws.run(&["opsworks", "create-deployment"]).await.unwrap_err();
        assert!(matches!(err, AwsError::Failed { ref operation, .. } if operation == "opsworks create-deployment"));
    }

    #[tokio::test]
    async fn non_json_stdout_is_parse_error() {
        let aws = AwsCli::new("us-east-1").program("echo");
        let err = aws.json::<serde_json::Value>(&["{}"]).await.unwrap_err();
        assert!(matches!(err, AwsError::Parse { .. }));
    }
}
