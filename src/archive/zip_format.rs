// ABOUTME: Zip container backend built on the zip crate.
// ABOUTME: Rewrites the archive through a temp file, copying kept entries without recompressing.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::entry::{self, DiskEntry, EntryKind};
use super::error::ArchiveError;
use super::format::ArchiveFormat;

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipFormat;

impl ZipFormat {
    /// Rewrite `archive`, keeping entries for which `keep` holds and then
    /// appending `additions` from disk.
    fn rewrite(
        archive: &Path,
        keep: impl Fn(&str) -> bool,
        additions: &[DiskEntry],
    ) -> Result<(), ArchiveError> {
        let mut source = ZipArchive::new(File::open(archive)?)?;
        let mut staged = NamedTempFile::new_in(parent_dir(archive))?;

        {
            let mut writer = ZipWriter::new(staged.as_file_mut());

            for index in 0..source.len() {
                let file = source.by_index_raw(index)?;
                if keep(file.name()) {
                    writer.raw_copy_file(file)?;
                }
            }

            for addition in additions {
                append(&mut writer, addition)?;
            }

            writer.finish()?;
        }

        drop(source);
        staged.persist(archive).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ArchiveFormat for ZipFormat {
    fn extension(&self) -> &'static str {
        "zip"
    }

    fn create_empty(&self, archive: &Path) -> Result<(), ArchiveError> {
        let writer = ZipWriter::new(File::create(archive)?);
        writer.finish()?;
        Ok(())
    }

    fn list(&self, archive: &Path) -> Result<Vec<String>, ArchiveError> {
        let source = ZipArchive::new(File::open(archive)?)?;
        Ok(source.file_names().map(str::to_string).collect())
    }

    fn add(&self, archive: &Path, root: &Path, path: &str) -> Result<(), ArchiveError> {
        let additions = entry::collect(root, path)?;
        let replaced: HashSet<&str> = additions.iter().map(|a| a.name.as_str()).collect();

        tracing::debug!(archive = %archive.display(), path, entries = additions.len(), "zip add");
        Self::rewrite(
            archive,
            |name| !replaced.contains(entry::entry_key(name)),
            &additions,
        )
    }

    fn remove(&self, archive: &Path, path: &str) -> Result<(), ArchiveError> {
        let path = entry::normalize_relative(path)?;

        let present = self
            .list(archive)?
            .iter()
            .any(|name| entry::is_within(name, &path));
        if !present {
            tracing::debug!(archive = %archive.display(), path, "zip remove: nothing to remove");
            return Ok(());
        }

        tracing::debug!(archive = %archive.display(), path, "zip remove");
        Self::rewrite(archive, |name| !entry::is_within(name, &path), &[])
    }
}

fn append<W: io::Write + io::Seek>(
    writer: &mut ZipWriter<W>,
    addition: &DiskEntry,
) -> Result<(), ArchiveError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(permissions(&addition.source)?);

    match addition.kind {
        EntryKind::Dir => writer.add_directory(addition.stored_name(), options)?,
        EntryKind::File => {
            writer.start_file(addition.stored_name(), options)?;
            io::copy(&mut File::open(&addition.source)?, writer)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn permissions(path: &Path) -> io::Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::metadata(path)?.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permissions(path: &Path) -> io::Result<u32> {
    Ok(if fs::metadata(path)?.is_dir() { 0o755 } else { 0o644 })
}

pub(super) fn parent_dir(archive: &Path) -> &Path {
    match archive.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
