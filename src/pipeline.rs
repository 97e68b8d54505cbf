// ABOUTME: Registry holding the single live build-task definition.
// ABOUTME: Registering again replaces the previous task rather than adding a second one.

use std::path::Path;

use crate::archive::{Archive, ArchiveBuilder, BuildError, run_prerequisites};
use crate::config::PackageConfig;
use crate::source::SnapshotProvider;

/// A registered build: prerequisites, then the archive builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTask {
    config: PackageConfig,
}

impl BuildTask {
    pub fn config(&self) -> &PackageConfig {
        &self.config
    }

    /// Run prerequisites in `root`, then build `filename` into `build_dir`.
    pub async fn run(
        &self,
        root: &Path,
        build_dir: &Path,
        snapshot: &dyn SnapshotProvider,
        filename: &str,
    ) -> Result<Archive, BuildError> {
        run_prerequisites(root, &self.config.prerequisites).await?;
        ArchiveBuilder::new(root, build_dir, snapshot)
            .build(&self.config, filename)
            .await
    }
}

/// Owned by `main` and filled in during setup.
#[derive(Debug, Default)]
pub struct PipelineRegistry {
    build: Option<BuildTask>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define the build task from `config`, replacing any earlier definition.
    pub fn register_build(&mut self, config: PackageConfig) -> &BuildTask {
        if self.build.is_some() {
            tracing::debug!("replacing previously registered build task");
        }
        self.build.insert(BuildTask { config })
    }

    pub fn build_task(&self) -> Option<&BuildTask> {
        self.build.as_ref()
    }

    /// Number of live build tasks: zero or one.
    pub fn registered_builds(&self) -> usize {
        usize::from(self.build.is_some())
    }
}
