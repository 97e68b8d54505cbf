// ABOUTME: Archive construction: git snapshot plus ordered include/exclude operations.
// ABOUTME: Exports the format interface, zip and tar backends, and the builder.

mod builder;
mod entry;
mod error;
mod format;
mod tar_format;
mod zip_format;

pub use builder::{Archive, ArchiveBuilder, run_prerequisites};
pub use entry::{PathError, normalize_relative};
pub use error::{ArchiveError, BuildError};
pub use format::{ArchiveFormat, Format};
pub use tar_format::TarFormat;
pub use zip_format::ZipFormat;
