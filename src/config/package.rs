// ABOUTME: Archive packaging settings: prerequisites, path lists and format.
// ABOUTME: Immutable once the build task is registered.

use crate::archive::Format;
use serde::Deserialize;

/// Asset compilation step run before every build unless overridden.
pub const DEFAULT_PREREQUISITE: &str =
    "RAILS_ENV=production bundle exec rake assets:clean assets:precompile";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageConfig {
    /// Shell commands run in order before the archive is built.
    pub prerequisites: Vec<String>,

    /// Paths merged into the snapshot, typically untracked build output.
    pub includes: Vec<String>,

    /// Extra paths merged after `includes`.
    pub additional_paths: Vec<String>,

    /// Paths removed from the archive after all merges.
    pub excludes: Vec<String>,

    pub format: Format,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            prerequisites: vec![DEFAULT_PREREQUISITE.to_string()],
            includes: vec!["public/assets".to_string()],
            additional_paths: Vec::new(),
            excludes: vec![".gitignore".to_string()],
            format: Format::Zip,
        }
    }
}

impl PackageConfig {
    /// Paths to merge, in the order they are applied.
    pub fn merged_paths(&self) -> impl Iterator<Item = &str> {
        self.includes
            .iter()
            .chain(&self.additional_paths)
            .map(String::as_str)
    }
}
