// ABOUTME: Time and progress seams for status polling.
// ABOUTME: Tests swap the clock for one that records sleeps instead of waiting.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::{DEFAULT_POLL_INTERVAL, DeploySettings};
use crate::fleet::DeploymentStatus;
use crate::types::Revision;

#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real time, via tokio's timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// `None` polls until the deployment finishes.
    pub timeout: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl From<&DeploySettings> for PollSettings {
    fn from(settings: &DeploySettings) -> Self {
        Self {
            interval: settings.poll_interval,
            timeout: settings.timeout,
        }
    }
}

/// Receives user-facing progress. Has no effect on the deployment itself.
pub trait DeployProgress: Send + Sync {
    fn step(&self, message: &str);

    fn poll_started(&self, revision: &Revision);

    /// Called once per status query.
    fn poll_tick(&self);

    fn poll_finished(&self, status: DeploymentStatus);
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl DeployProgress for Silent {
    fn step(&self, _message: &str) {}
    fn poll_started(&self, _revision: &Revision) {}
    fn poll_tick(&self) {}
    fn poll_finished(&self, _status: DeploymentStatus) {}
}
