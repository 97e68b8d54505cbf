// ABOUTME: Deployment settings: region override and status polling cadence.
// ABOUTME: Durations use humantime strings such as "5s" or "30m".

use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploySettings {
    /// Region for the store and fleet clients. Falls back to the environment, then us-east-1.
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Upper bound on status polling. Unbounded when absent.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

impl Default for DeploySettings {
    fn default() -> Self {
        DeploySettings {
            region: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}
