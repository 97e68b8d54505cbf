// ABOUTME: Hooks for deployment lifecycle events.
// ABOUTME: A fixed table of before-deploy, on-failure and on-finished actions, no-op by default.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::config::HooksConfig;
use crate::fleet::DeploymentStatus;
use crate::process::{self, SpawnError};
use crate::types::{DeploymentId, Revision};

/// Hook execution points in the deployment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// After the artifact is confirmed, before the deployment is triggered.
    BeforeDeploy,
    /// The deployment ended in failure or timed out.
    OnFailure,
    /// The deployment ended successfully.
    OnFinished,
}

impl HookPoint {
    pub const ALL: [HookPoint; 3] = [
        HookPoint::BeforeDeploy,
        HookPoint::OnFailure,
        HookPoint::OnFinished,
    ];

    /// Hook name, also the script filename under `.stackpack/hooks/`.
    pub fn name(&self) -> &'static str {
        match self {
            HookPoint::BeforeDeploy => "before-deploy",
            HookPoint::OnFailure => "on-failure",
            HookPoint::OnFinished => "on-finished",
        }
    }
}

/// Context passed to hooks. Command hooks see it as environment variables.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub app: String,
    pub stack: String,
    pub artifact_url: String,
    pub revision: Revision,
    pub deployment_id: Option<DeploymentId>,
    pub status: Option<DeploymentStatus>,
}

impl HookContext {
    pub fn to_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("STACKPACK_APP".to_string(), self.app.clone());
        env.insert("STACKPACK_STACK".to_string(), self.stack.clone());
        env.insert("STACKPACK_ARTIFACT_URL".to_string(), self.artifact_url.clone());
        env.insert("STACKPACK_REVISION".to_string(), self.revision.to_string());
        if let Some(ref id) = self.deployment_id {
            env.insert("STACKPACK_DEPLOYMENT_ID".to_string(), id.to_string());
        }
        if let Some(status) = self.status {
            env.insert("STACKPACK_STATUS".to_string(), status.to_string());
        }
        env
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("{hook} hook could not be started: {source}")]
    Spawn {
        hook: &'static str,
        #[source]
        source: SpawnError,
    },

    #[error("{hook} hook failed with exit code {code}: {stderr}")]
    Failed {
        hook: &'static str,
        code: String,
        stderr: String,
    },

    #[error("{hook} hook failed: {message}")]
    Action { hook: &'static str, message: String },
}

/// An action bound to a hook point.
#[async_trait]
pub trait Hook: Send + Sync {
    async fn run(&self, point: HookPoint, context: &HookContext) -> Result<(), HookError>;
}

/// Does nothing. Every point starts out bound to this.
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

#[async_trait]
impl Hook for Noop {
    async fn run(&self, _point: HookPoint, _context: &HookContext) -> Result<(), HookError> {
        Ok(())
    }
}

/// Wraps a synchronous closure. An `Err` message becomes a hook failure.
pub struct FnHook<F> {
    action: F,
}

impl<F> FnHook<F>
where
    F: Fn(&HookContext) -> Result<(), String> + Send + Sync,
{
    pub fn new(action: F) -> Self {
        Self { action }
    }
}

#[async_trait]
impl<F> Hook for FnHook<F>
where
    F: Fn(&HookContext) -> Result<(), String> + Send + Sync,
{
    async fn run(&self, point: HookPoint, context: &HookContext) -> Result<(), HookError> {
        (self.action)(context).map_err(|message| HookError::Action {
            hook: point.name(),
            message,
        })
    }
}

#[derive(Debug, Clone)]
enum Invocation {
    Shell(String),
    Script(PathBuf),
}

/// Runs a shell command or an executable script in the project directory.
#[derive(Debug, Clone)]
pub struct CommandHook {
    invocation: Invocation,
    working_dir: PathBuf,
}

impl CommandHook {
    /// A command line run through `sh -c`.
    pub fn shell(command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            invocation: Invocation::Shell(command.into()),
            working_dir: working_dir.into(),
        }
    }

    /// An executable file run directly.
    pub fn script(path: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            invocation: Invocation::Script(path.into()),
            working_dir: working_dir.into(),
        }
    }

    fn command(&self) -> Command {
        let mut command = match &self.invocation {
            Invocation::Shell(line) => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(line);
                command
            }
            Invocation::Script(path) => Command::new(path),
        };
        command.current_dir(&self.working_dir);
        command
    }
}

#[async_trait]
impl Hook for CommandHook {
    async fn run(&self, point: HookPoint, context: &HookContext) -> Result<(), HookError> {
        let mut command = self.command();
        command.envs(context.to_env());

        let output = process::capture(command)
            .await
            .map_err(|source| HookError::Spawn {
                hook: point.name(),
                source,
            })?;

        if !output.stdout.trim().is_empty() {
            tracing::info!(hook = point.name(), "{}", output.stdout.trim());
        }

        if !output.success() {
            return Err(HookError::Failed {
                hook: point.name(),
                code: output.code(),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Directory where hook scripts are discovered.
pub fn hooks_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(".stackpack").join("hooks")
}

/// One action per hook point. Built before a deployment starts and only
/// borrowed while it runs.
pub struct HookTable {
    before_deploy: Box<dyn Hook>,
    on_failure: Box<dyn Hook>,
    on_finished: Box<dyn Hook>,
}

impl Default for HookTable {
    fn default() -> Self {
        Self {
            before_deploy: Box::new(Noop),
            on_failure: Box::new(Noop),
            on_finished: Box::new(Noop),
        }
    }
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `hook` to `point`, replacing the previous action.
    pub fn with(mut self, point: HookPoint, hook: impl Hook + 'static) -> Self {
        let slot = match point {
            HookPoint::BeforeDeploy => &mut self.before_deploy,
            HookPoint::OnFailure => &mut self.on_failure,
            HookPoint::OnFinished => &mut self.on_finished,
        };
        *slot = Box::new(hook);
        self
    }

    /// Configured commands first, then scripts in `.stackpack/hooks/`.
    pub fn from_config(config: &HooksConfig, project_dir: &Path) -> Self {
        let scripts = hooks_dir(project_dir);
        let mut table = Self::default();

        for point in HookPoint::ALL {
            if let Some(line) = config.command(point) {
                tracing::debug!(hook = point.name(), command = line, "using configured hook");
                table = table.with(point, CommandHook::shell(line, project_dir));
                continue;
            }

            let script = scripts.join(point.name());
            if script.is_file() {
                tracing::debug!(hook = point.name(), path = %script.display(), "using hook script");
                table = table.with(point, CommandHook::script(script, project_dir));
            }
        }

        table
    }

    fn hook(&self, point: HookPoint) -> &dyn Hook {
        match point {
            HookPoint::BeforeDeploy => self.before_deploy.as_ref(),
            HookPoint::OnFailure => self.on_failure.as_ref(),
            HookPoint::OnFinished => self.on_finished.as_ref(),
        }
    }

    pub async fn invoke(&self, point: HookPoint, context: &HookContext) -> Result<(), HookError> {
        tracing::info!(hook = point.name(), "running hook");
        match self.hook(point).run(point, context).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(hook = point.name(), error = %e, "hook failed");
                Err(e)
            }
        }
    }
}
