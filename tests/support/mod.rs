// ABOUTME: Test support utilities.
// ABOUTME: In-memory fakes for git, the object store, the fleet service, time and progress.

#![allow(dead_code)]

use async_trait::async_trait;
use stackpack::archive::{ArchiveError, Format};
use stackpack::deploy::{Clock, DeployProgress};
use stackpack::fleet::{DeploymentClient, DeploymentRequest, DeploymentStatus, FleetError};
use stackpack::hooks::{FnHook, HookPoint, HookTable};
use stackpack::source::{SnapshotProvider, SourceError, UpstreamProbe};
use stackpack::store::{ArtifactLocation, ArtifactStore, StoreError};
use stackpack::types::{DeploymentId, Revision};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

pub const HASH: &str = "abc123def4567890abc123def4567890abc123de";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("stackpack=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn revision() -> Revision {
    Revision::parse(HASH).unwrap()
}

/// Ordered log of every call the fakes see.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.events().iter().position(|e| e.starts_with(prefix))
    }
}

/// Write `contents` to `root/path`, creating parent directories.
pub fn write_file(root: &Path, path: &str, contents: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, contents).unwrap();
}

/// Stands in for `git archive`: exports the listed files from a directory.
pub struct TreeSnapshot {
    pub root: PathBuf,
    pub tracked: Vec<String>,
}

impl TreeSnapshot {
    pub fn new(root: &Path, tracked: &[&str]) -> Self {
        Self {
            root: root.to_path_buf(),
            tracked: tracked.iter().map(|p| p.to_string()).collect(),
        }
    }
}

fn export_failed(e: ArchiveError) -> SourceError {
    SourceError::Failed {
        command: "export".to_string(),
        code: "1".to_string(),
        stderr: e.to_string(),
    }
}

#[async_trait]
impl SnapshotProvider for TreeSnapshot {
    async fn revision(&self) -> Result<Revision, SourceError> {
        Ok(revision())
    }

    async fn export(&self, format: Format, dest: &Path) -> Result<(), SourceError> {
        let handler = format.handler();
        handler.create_empty(dest).map_err(export_failed)?;
        for path in &self.tracked {
            handler.add(dest, &self.root, path).map_err(export_failed)?;
        }
        Ok(())
    }
}

pub struct FakeUpstream {
    pub pending: String,
    pub journal: Journal,
}

impl FakeUpstream {
    pub fn in_sync(journal: &Journal) -> Self {
        Self {
            pending: String::new(),
            journal: journal.clone(),
        }
    }

    pub fn diverged(journal: &Journal) -> Self {
        Self {
            pending: "From github.com:org/app\n   1a2b3c4..5d6e7f8  main -> origin/main"
                .to_string(),
            journal: journal.clone(),
        }
    }
}

#[async_trait]
impl UpstreamProbe for FakeUpstream {
    async fn pending_changes(&self) -> Result<String, SourceError> {
        self.journal.record("upstream.fetch");
        Ok(self.pending.clone())
    }
}

pub struct FakeStore {
    pub present: bool,
    pub journal: Journal,
}

impl FakeStore {
    pub fn with_artifact(journal: &Journal) -> Self {
        Self {
            present: true,
            journal: journal.clone(),
        }
    }

    pub fn empty(journal: &Journal) -> Self {
        Self {
            present: false,
            journal: journal.clone(),
        }
    }
}

#[async_trait]
impl ArtifactStore for FakeStore {
    async fn exists(&self, location: &ArtifactLocation) -> Result<bool, StoreError> {
        self.journal.record(format!("store.exists {}", location.key()));
        Ok(self.present)
    }

    async fn upload(&self, _local: &Path, location: &ArtifactLocation) -> Result<(), StoreError> {
        self.journal.record(format!("store.upload {}", location.key()));
        Ok(())
    }
}

/// One scripted answer to a status query.
#[derive(Debug, Clone, Copy)]
pub enum Poll {
    Status(DeploymentStatus),
    Unreachable,
}

pub struct FakeFleet {
    pub polls: Mutex<VecDeque<Poll>>,
    pub journal: Journal,
}

impl FakeFleet {
    pub fn new(journal: &Journal, polls: impl IntoIterator<Item = Poll>) -> Self {
        Self {
            polls: Mutex::new(polls.into_iter().collect()),
            journal: journal.clone(),
        }
    }

    /// Reports running `running` times, then `last`.
    pub fn finishing(journal: &Journal, running: usize, last: DeploymentStatus) -> Self {
        let polls = std::iter::repeat_n(Poll::Status(DeploymentStatus::Running), running)
            .chain(std::iter::once(Poll::Status(last)));
        Self::new(journal, polls)
    }
}

#[async_trait]
impl DeploymentClient for FakeFleet {
    async fn trigger(&self, request: &DeploymentRequest) -> Result<DeploymentId, FleetError> {
        self.journal.record(format!(
            "fleet.trigger {} {} {}",
            request.app_name, request.stack_name, request.artifact_url
        ));
        Ok(DeploymentId::new("d-1"))
    }

    async fn status(&self, deployment: &DeploymentId) -> Result<DeploymentStatus, FleetError> {
        self.journal.record("fleet.status");
        // An exhausted script keeps reporting running.
        let next = self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Poll::Status(DeploymentStatus::Running));
        match next {
            Poll::Status(status) => Ok(status),
            Poll::Unreachable => Err(FleetError::DeploymentNotFound(deployment.clone())),
        }
    }
}

/// Records sleeps instead of waiting.
pub struct RecordingClock {
    pub sleeps: Mutex<Vec<Duration>>,
    pub journal: Journal,
}

impl RecordingClock {
    pub fn new(journal: &Journal) -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            journal: journal.clone(),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.journal.record(format!("sleep {}", duration.as_secs()));
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub struct RecordingProgress {
    pub journal: Journal,
}

impl DeployProgress for RecordingProgress {
    fn step(&self, message: &str) {
        self.journal.record(format!("progress.step {message}"));
    }

    fn poll_started(&self, revision: &Revision) {
        self.journal
            .record(format!("progress.start {}", revision.short()));
    }

    fn poll_tick(&self) {
        self.journal.record("progress.tick");
    }

    fn poll_finished(&self, status: DeploymentStatus) {
        self.journal.record(format!("progress.finish {status}"));
    }
}

/// A table where every hook just records that it ran.
pub fn recording_hooks(journal: &Journal) -> HookTable {
    let mut table = HookTable::new();
    for point in HookPoint::ALL {
        let journal = journal.clone();
        table = table.with(
            point,
            FnHook::new(move |_| {
                journal.record(format!("hook {}", point.name()));
                Ok(())
            }),
        );
    }
    table
}
