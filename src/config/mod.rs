// ABOUTME: Configuration types and parsing for stackpack.yml.
// ABOUTME: Handles YAML parsing, file discovery, defaults and validation.

mod deploy;
mod hooks;
mod package;

pub use deploy::{DEFAULT_POLL_INTERVAL, DeploySettings};
pub use hooks::HooksConfig;
pub use package::PackageConfig;

use crate::archive;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "stackpack.yml";
pub const CONFIG_FILENAME_ALT: &str = "stackpack.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".stackpack/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Working directory for built archives, relative to the project root.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub deploy: DeploySettings,

    #[serde(default)]
    pub hooks: HooksConfig,
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            build_dir: default_build_dir(),
            package: PackageConfig::default(),
            deploy: DeploySettings::default(),
            hooks: HooksConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Look for a config file in `dir`; fall back to defaults when none exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        tracing::debug!(dir = %dir.display(), "no configuration file, using defaults");
        Ok(Config::default())
    }

    fn validate(&self) -> Result<()> {
        let paths = self
            .package
            .includes
            .iter()
            .chain(&self.package.additional_paths)
            .chain(&self.package.excludes);

        for path in paths {
            archive::normalize_relative(path)
                .map_err(|e| Error::InvalidConfig(format!("package path {path:?}: {e}")))?;
        }

        if self.deploy.poll_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "deploy.poll_interval must be greater than zero".to_string(),
            ));
        }

        if self.build_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("build_dir cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Absolute build directory for a project rooted at `root`.
    pub fn build_dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.build_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Format;
    use std::time::Duration;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.build_dir, PathBuf::from("build"));
        assert_eq!(config.package.format, Format::Zip);
        assert_eq!(config.deploy.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn rejects_parent_traversal_in_includes() {
        let yaml = "package:\n  includes: [\"../secrets\"]\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("../secrets"));
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let yaml = "deploy:\n  poll_interval: 0s\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("poll_interval"));
    }

    #[test]
    fn build_dir_is_resolved_against_root() {
        let config = Config::default();
        assert_eq!(
            config.build_dir_in(Path::new("/srv/app")),
            PathBuf::from("/srv/app/build")
        );
    }
}
