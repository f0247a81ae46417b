//! Single-level directory listing for the file browser.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Label of the synthetic parent entry.
pub const PARENT_LABEL: &str = "..";

/// Label of the placeholder shown when a directory cannot be listed.
pub const UNREADABLE_LABEL: &str = ".. [Error]";

/// Error type for directory listing.
#[derive(Debug, Error)]
pub enum ListError {
    /// The directory could not be read (permissions, vanished, not a directory).
    #[error("cannot read directory {path}: {source}")]
    NotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a browser line points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// The synthetic `..` entry.
    Parent,
    /// A child directory.
    Directory,
    /// Any non-directory child.
    File,
    /// Placeholder standing in for a listing that failed; behaves like `..`.
    Unreadable,
}

/// One line of the file browser.
///
/// Recomputed every time the current directory is listed; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Display name (file name, `..`, or the error placeholder label).
    pub name: String,
    /// Absolute path the entry resolves to. For `..` this is the parent.
    pub path: PathBuf,
    /// Entry classification.
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Synthetic parent entry for `dir`.
    #[must_use]
    pub fn parent_of(dir: &Path) -> Self {
        Self {
            name: PARENT_LABEL.to_string(),
            path: parent_or_self(dir),
            kind: EntryKind::Parent,
        }
    }

    /// Placeholder entry used when `dir` cannot be listed.
    #[must_use]
    pub fn unreadable(dir: &Path) -> Self {
        Self {
            name: UNREADABLE_LABEL.to_string(),
            path: parent_or_self(dir),
            kind: EntryKind::Unreadable,
        }
    }

    /// Whether entering this entry changes directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        !matches!(self.kind, EntryKind::File)
    }

    /// Whether this entry moves to the parent directory.
    #[must_use]
    pub fn is_parent(&self) -> bool {
        matches!(self.kind, EntryKind::Parent | EntryKind::Unreadable)
    }
}

/// Parent of `dir`, or `dir` itself at the filesystem root.
#[must_use]
pub fn parent_or_self(dir: &Path) -> PathBuf {
    dir.parent()
        .map_or_else(|| dir.to_path_buf(), Path::to_path_buf)
}

/// Whether `dir` is a filesystem root.
#[must_use]
pub fn is_root(dir: &Path) -> bool {
    dir.parent().is_none()
}

/// List the immediate children of `dir`.
///
/// The result starts with a `..` entry unless `dir` is the filesystem root,
/// followed by directories and then files, each sorted case-insensitively.
/// Names starting with `.` are skipped unless `show_hidden` is set.
///
/// # Errors
///
/// Returns [`ListError::NotReadable`] if the directory cannot be opened.
pub fn list_directory(dir: &Path, show_hidden: bool) -> Result<Vec<DirectoryEntry>, ListError> {
    let read_dir = fs::read_dir(dir).map_err(|source| ListError::NotReadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        // Follows symlinks so a link to a directory is browsable
        let is_dir = fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false);

        let kind = if is_dir {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let item = DirectoryEntry { name, path, kind };
        if is_dir {
            dirs.push(item);
        } else {
            files.push(item);
        }
    }

    sort_case_insensitive(&mut dirs);
    sort_case_insensitive(&mut files);

    let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
    if !is_root(dir) {
        entries.push(DirectoryEntry::parent_of(dir));
    }
    entries.extend(dirs);
    entries.extend(files);
    Ok(entries)
}

/// List `dir`, degrading to a single placeholder entry on failure.
///
/// The placeholder behaves like `..` so the user can always back out.
pub fn list_or_placeholder(
    dir: &Path,
    show_hidden: bool,
) -> (Vec<DirectoryEntry>, Option<ListError>) {
    match list_directory(dir, show_hidden) {
        Ok(entries) => (entries, None),
        Err(e) => {
            log::warn!("{}", e);
            (vec![DirectoryEntry::unreadable(dir)], Some(e))
        }
    }
}

fn sort_case_insensitive(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}
