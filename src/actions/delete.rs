//! File deletion.
//!
//! # Overview
//!
//! Deletion is irreversible in the default `permanent` mode. The `trash`
//! mode moves the file to the platform trash instead; either way the file
//! is gone from its location and the review line becomes a tombstone.
//!
//! ```no_run
//! use dupbrowse::actions::delete::{delete_file, DeleteMode};
//! use std::path::Path;
//!
//! let result = delete_file(Path::new("/media/b.jpg"), DeleteMode::Permanent);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during deletion.
#[derive(Error, Debug)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The target was already deleted in this session.
    #[error("already removed: {0}")]
    AlreadyRemoved(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Path involved in the error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::AlreadyRemoved(p) => p,
            Self::TrashFailed { path, .. }
            | Self::PermanentDeleteFailed { path, .. }
            | Self::Io { path, .. } => path,
        }
    }

    /// Whether the failure should be shown to the user.
    ///
    /// Deleting a tombstone again is silently ignored.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::AlreadyRemoved(_))
    }
}

/// How files are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Unlink the file.
    #[default]
    Permanent,
    /// Move the file to the platform trash.
    Trash,
}

/// Result of a successful deletion.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Path that was deleted
    pub path: PathBuf,
    /// Size of the deleted file in bytes
    pub size: u64,
    /// Whether the file was unlinked rather than trashed
    pub permanent: bool,
}

fn stat(path: &Path) -> Result<u64, DeleteError> {
    fs::symlink_metadata(path)
        .map(|m| m.len())
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
            _ => DeleteError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })
}

/// Delete `path` according to `mode`.
///
/// # Errors
///
/// Returns [`DeleteError`] if the file is missing or cannot be removed.
pub fn delete_file(path: &Path, mode: DeleteMode) -> Result<DeleteResult, DeleteError> {
    match mode {
        DeleteMode::Permanent => permanent_delete(path),
        DeleteMode::Trash => delete_to_trash(path),
    }
}

/// Move a file to the system trash.
///
/// # Errors
///
/// Returns [`DeleteError::NotFound`] or [`DeleteError::TrashFailed`].
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = stat(path)?;

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        permanent: false,
    })
}

/// Permanently delete a file.
///
/// # Errors
///
/// Returns [`DeleteError::NotFound`], [`DeleteError::PermissionDenied`] or
/// [`DeleteError::PermanentDeleteFailed`].
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = stat(path)?;

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        match e.kind() {
            io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
            _ => DeleteError::PermanentDeleteFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        }
    })?;

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        permanent: true,
    })
}
