// ABOUTME: Entry-name normalization and project-tree walking.
// ABOUTME: Shared by the zip and tar backends so both apply identical path rules.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ArchiveError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path must be relative to the project root")]
    Absolute,

    #[error("path must not contain '..'")]
    ParentTraversal,
}

/// Normalize a configured path into an entry name: `/`-separated, no `.`
/// components, no leading or trailing slash.
pub fn normalize_relative(path: &str) -> Result<String, PathError> {
    let path = path.trim();

    if path.starts_with('/') {
        return Err(PathError::Absolute);
    }

    let mut parts = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => continue,
            ".." => return Err(PathError::ParentTraversal),
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return Err(PathError::Empty);
    }

    Ok(parts.join("/"))
}

/// Entry name without `./` prefix or trailing `/`.
pub(crate) fn entry_key(name: &str) -> &str {
    let name = name.strip_prefix("./").unwrap_or(name);
    name.trim_end_matches('/')
}

/// Whether entry `name` is `path` itself or lies beneath it.
pub(crate) fn is_within(name: &str, path: &str) -> bool {
    let key = entry_key(name);
    key == path
        || key
            .strip_prefix(path)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    Dir,
    File,
}

/// A file or directory on disk destined for the container.
#[derive(Debug, Clone)]
pub(crate) struct DiskEntry {
    /// Entry key (no trailing slash).
    pub name: String,
    pub source: PathBuf,
    pub kind: EntryKind,
}

impl DiskEntry {
    /// Name as stored in a container; directories end in `/`.
    pub fn stored_name(&self) -> String {
        match self.kind {
            EntryKind::Dir => format!("{}/", self.name),
            EntryKind::File => self.name.clone(),
        }
    }
}

/// Collect `path` under `root` and everything beneath it, parents first, siblings sorted.
pub(crate) fn collect(root: &Path, path: &str) -> Result<Vec<DiskEntry>, ArchiveError> {
    let name = normalize_relative(path)?;
    let source = root.join(&name);

    if !source.exists() {
        return Err(ArchiveError::MissingPath(name));
    }

    let mut entries = Vec::new();
    walk(&source, name, &mut entries)?;
    Ok(entries)
}

fn walk(source: &Path, name: String, entries: &mut Vec<DiskEntry>) -> Result<(), ArchiveError> {
    let metadata = fs::metadata(source)?;

    if !metadata.is_dir() {
        entries.push(DiskEntry {
            name,
            source: source.to_path_buf(),
            kind: EntryKind::File,
        });
        return Ok(());
    }

    entries.push(DiskEntry {
        name: name.clone(),
        source: source.to_path_buf(),
        kind: EntryKind::Dir,
    });

    let mut children = fs::read_dir(source)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<Result<Vec<_>, _>>()?;
    children.sort();

    for child in children {
        let child_name = format!("{}/{}", name, child.to_string_lossy());
        walk(&source.join(&child), child_name, entries)?;
    }

    Ok(())
}
