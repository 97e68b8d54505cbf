// ABOUTME: Container formats and the shared add/remove interface.
// ABOUTME: Zip and tar differ only in how entries are merged and deleted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::error::ArchiveError;
use super::tar_format::TarFormat;
use super::zip_format::ZipFormat;

/// Supported container formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Zip,
    Tar,
}

impl Format {
    /// File extension, also the name `git archive --format` expects.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Zip => "zip",
            Format::Tar => "tar",
        }
    }

    /// Backend that manipulates containers of this format.
    pub fn handler(&self) -> &'static dyn ArchiveFormat {
        match self {
            Format::Zip => &ZipFormat,
            Format::Tar => &TarFormat,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Operations on a container file on disk.
///
/// Entry names are relative, `/`-separated, and directories carry a trailing
/// `/`. Mutations replace the container atomically.
pub trait ArchiveFormat: Send + Sync {
    fn extension(&self) -> &'static str;

    /// Write a container with no entries.
    fn create_empty(&self, archive: &Path) -> Result<(), ArchiveError>;

    /// Entry names in container order.
    fn list(&self, archive: &Path) -> Result<Vec<String>, ArchiveError>;

    /// Merge `path` (relative to `root`) recursively, replacing entries of the same name.
    fn add(&self, archive: &Path, root: &Path, path: &str) -> Result<(), ArchiveError>;

    /// Drop every entry equal to or beneath `path`. Absent paths are a no-op.
    fn remove(&self, archive: &Path, path: &str) -> Result<(), ArchiveError>;
}
