// ABOUTME: Hook command configuration.
// ABOUTME: Each lifecycle point may bind one shell command.

use serde::Deserialize;

use crate::hooks::HookPoint;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HooksConfig {
    #[serde(default)]
    pub before_deploy: Option<String>,

    #[serde(default)]
    pub on_failure: Option<String>,

    #[serde(default)]
    pub on_finished: Option<String>,
}

impl HooksConfig {
    /// Configured command for a hook point, if any.
    pub fn command(&self, point: HookPoint) -> Option<&str> {
        match point {
            HookPoint::BeforeDeploy => self.before_deploy.as_deref(),
            HookPoint::OnFailure => self.on_failure.as_deref(),
            HookPoint::OnFinished => self.on_finished.as_deref(),
        }
    }
}
