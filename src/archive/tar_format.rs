// ABOUTME: Tar container backend built on the tar crate.
// ABOUTME: Streams kept entries into a temp file and appends new ones from disk.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use tar::{Archive as TarArchive, Builder};
use tempfile::NamedTempFile;

use super::entry::{self, DiskEntry, EntryKind};
use super::error::ArchiveError;
use super::format::ArchiveFormat;
use super::zip_format::parent_dir;

#[derive(Debug, Clone, Copy, Default)]
pub struct TarFormat;

impl TarFormat {
    fn rewrite(
        archive: &Path,
        keep: impl Fn(&str) -> bool,
        additions: &[DiskEntry],
    ) -> Result<(), ArchiveError> {
        let mut staged = NamedTempFile::new_in(parent_dir(archive))?;

        {
            let mut builder = Builder::new(staged.as_file_mut());
            let mut source = TarArchive::new(File::open(archive)?);

            for entry in source.entries()? {
                let mut entry = entry?;
                let mut header = entry.header().clone();

                // git archive stores the commit id in a pax global header; carry it over as-is.
                if header.entry_type().is_pax_global_extensions() {
                    builder.append(&header, &mut entry)?;
                    continue;
                }

                let name = entry.path()?.to_string_lossy().into_owned();
                if keep(&name) {
                    builder.append_data(&mut header, &name, &mut entry)?;
                }
            }

            for addition in additions {
                match addition.kind {
                    EntryKind::Dir => builder.append_dir(&addition.name, &addition.source)?,
                    EntryKind::File => {
                        builder.append_path_with_name(&addition.source, &addition.name)?
                    }
                }
            }

            builder.into_inner()?;
        }

        staged.persist(archive).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ArchiveFormat for TarFormat {
    fn extension(&self) -> &'static str {
        "tar"
    }

    fn create_empty(&self, archive: &Path) -> Result<(), ArchiveError> {
        Builder::new(File::create(archive)?).into_inner()?;
        Ok(())
    }

    fn list(&self, archive: &Path) -> Result<Vec<String>, ArchiveError> {
        let mut source = TarArchive::new(File::open(archive)?);
        let mut names = Vec::new();

        for entry in source.entries()? {
            let entry = entry?;
            let kind = entry.header().entry_type();
            if kind.is_pax_global_extensions() || kind.is_pax_local_extensions() {
                continue;
            }

            let name = entry.path()?.to_string_lossy().into_owned();
            let name = entry::entry_key(&name).to_string();
            if kind.is_dir() {
                names.push(format!("{name}/"));
            } else {
                names.push(name);
            }
        }

        Ok(names)
    }

    fn add(&self, archive: &Path, root: &Path, path: &str) -> Result<(), ArchiveError> {
        let additions = entry::collect(root, path)?;
        let replaced: HashSet<&str> = additions.iter().map(|a| a.name.as_str()).collect();

        tracing::debug!(archive = %archive.display(), path, entries = additions.len(), "tar add");
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
            tracing::debug!(archive = %archive.display(), path, "tar remove: nothing to remove");
            return Ok(());
        }

        tracing::debug!(archive = %archive.display(), path, "tar remove");
        Self::rewrite(archive, |name| !entry::is_within(name, &path), &[])
    }
}
