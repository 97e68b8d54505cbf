// ABOUTME: Command module aggregator for the stackpack CLI.
// ABOUTME: Re-exports build, upload and deploy handlers and their shared setup.

mod build;
mod deploy;
mod upload;

pub use build::build;
pub use deploy::deploy;
pub use upload::upload;

use std::path::PathBuf;
use stackpack::config::Config;
use stackpack::error::Result;
use stackpack::naming::NamingResolver;
use stackpack::source::SnapshotProvider;

/// Project root and its loaded configuration.
pub struct Context {
    pub root: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn naming(&self) -> NamingResolver {
        NamingResolver::from_env(
            self.config.package.format,
            self.config.deploy.region.as_deref(),
        )
    }

    pub fn build_dir(&self) -> PathBuf {
        self.config.build_dir_in(&self.root)
    }
}

/// Explicit argument, else `PACKAGE_FILENAME`, else the revision-based default.
///
/// Git is only consulted when nothing else names the artifact.
async fn artifact_filename(
    explicit: Option<String>,
    naming: &NamingResolver,
    snapshot: &dyn SnapshotProvider,
) -> Result<String> {
    if let Some(filename) = explicit {
        return Ok(filename);
    }
    if let Some(filename) = naming.filename_override() {
        return Ok(filename.to_string());
    }
    let revision = snapshot.revision().await?;
    Ok(naming.default_filename(&revision))
}
