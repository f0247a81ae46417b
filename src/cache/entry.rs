//! Cache side file format.
//!
//! A cache file is a JSON object stored inside the scanned directory:
//!
//! ```json
//! { "mtime": 1700000000.25, "groups": [ { "id": "…", "paths": ["…", "…"] } ] }
//! ```
//!
//! Files written by the older line-oriented browsers carry `"lines"`
//! instead of `"groups"`; both are accepted when reading.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duplicates::DuplicateGroup;
use crate::scanner::parse_group_lines;

/// Largest mtime difference still considered the same timestamp, in seconds.
pub const MTIME_TOLERANCE: f64 = 1e-6;

/// One duplicate group as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedGroup {
    /// Group identifier
    pub id: String,
    /// Member paths in scanner order
    pub paths: Vec<PathBuf>,
}

/// Persisted result of one scan of one directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Directory modification time when the entry was written, in seconds since the epoch
    #[serde(rename = "mtime")]
    pub directory_mtime: f64,

    /// Directory the entry describes
    #[serde(default, rename = "directory", skip_serializing_if = "Option::is_none")]
    pub scanned_directory: Option<PathBuf>,

    /// When the scan ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scanned_at: Option<DateTime<Utc>>,

    /// Structured groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<CachedGroup>>,

    /// Line-oriented groups from older tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<String>>,
}

impl CacheEntry {
    /// Build an entry for `directory` from live groups.
    #[must_use]
    pub fn new(directory: &Path, directory_mtime: f64, groups: &[DuplicateGroup]) -> Self {
        let groups = groups
            .iter()
            .map(|g| CachedGroup {
                id: g.id.clone(),
                paths: g.live_paths(),
            })
            .collect();
        Self {
            directory_mtime,
            scanned_directory: Some(directory.to_path_buf()),
            scanned_at: Some(Utc::now()),
            groups: Some(groups),
            lines: None,
        }
    }

    /// Whether the entry was written for a directory with this mtime.
    #[must_use]
    pub fn is_fresh(&self, current_mtime: f64) -> bool {
        (self.directory_mtime - current_mtime).abs() < MTIME_TOLERANCE
    }

    /// Convert the stored payload back into duplicate groups.
    ///
    /// Relative paths in a line payload are resolved against `directory`.
    /// Groups with fewer than two paths are dropped.
    #[must_use]
    pub fn to_groups(&self, directory: &Path) -> Vec<DuplicateGroup> {
        if let Some(groups) = &self.groups {
            return groups
                .iter()
                .filter_map(|g| DuplicateGroup::new(g.id.clone(), g.paths.clone()))
                .collect();
        }
        self.lines
            .as_ref()
            .map(|lines| {
                parse_group_lines(lines, directory)
                    .into_iter()
                    .filter_map(DuplicateGroup::from_record)
                    .collect()
            })
            .unwrap_or_default()
    }
}
