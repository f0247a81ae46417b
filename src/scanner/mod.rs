//! Duplicate scan backends.
//!
//! This module provides:
//! - The [`DuplicateBackend`] capability shared by all media kinds
//! - [`image::ImageBackend`]: BLAKE3 of the first bytes of each image
//! - [`video::VideoBackend`]: the external `vid_dup_finder` tool
//! - [`parse_group_lines`] for line-oriented duplicate listings
//!
//! # Architecture
//!
//! The browser treats every backend as one opaque, blocking call that
//! returns `{ group_id, member_paths }` records. Backends may parallelize
//! internally; progress is reported only as coarse text through
//! [`ScanProgress`].
//!
//! # Example
//!
//! ```
//! use dupbrowse::scanner::parse_group_lines;
//! use std::path::Path;
//!
//! let output = "--- SET: 1 ---\n/m/a.mp4\n/m/b.mp4\n\n";
//! let records = parse_group_lines(output.lines(), Path::new("/m"));
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].member_paths.len(), 2);
//! ```

pub mod image;
pub mod video;

use std::path::{Path, PathBuf};

use crate::config::Config;

pub use image::ImageBackend;
pub use video::VideoBackend;

/// One duplicate group as produced by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRecord {
    /// Opaque identifier (content hash or sequence number)
    pub group_id: String,
    /// Absolute member paths in backend order
    pub member_paths: Vec<PathBuf>,
}

impl ScanRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(group_id: impl Into<String>, member_paths: Vec<PathBuf>) -> Self {
        Self {
            group_id: group_id.into(),
            member_paths,
        }
    }
}

/// Errors that can occur while running a backend scan.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The backend's external tool is missing or cannot be started.
    #[error("{backend} scanner unavailable: {reason}")]
    BackendUnavailable {
        /// Backend name
        backend: &'static str,
        /// What is missing
        reason: String,
    },

    /// An I/O error occurred while accessing the scanned directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The backend ran but could not complete.
    #[error("Scan failed: {0}")]
    Failed(String),
}

/// Coarse progress sink for a running scan.
pub trait ScanProgress {
    /// A free-form status line.
    fn message(&mut self, text: &str);

    /// `done` of `total` items processed.
    fn progress(&mut self, done: usize, total: usize);
}

/// Progress sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn message(&mut self, _text: &str) {}
    fn progress(&mut self, _done: usize, _total: usize) {}
}

/// Media kinds with a scan backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Still images
    Image,
    /// Video files
    Video,
}

impl BackendKind {
    /// Every backend kind, in menu order.
    pub const ALL: [BackendKind; 2] = [BackendKind::Image, BackendKind::Video];

    /// Short name used in logs and errors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Name of the cache side file this backend writes into a scanned directory.
    #[must_use]
    pub fn cache_file_name(self) -> &'static str {
        match self {
            Self::Image => ".img_dups_cache",
            Self::Video => ".vid_dups_cache",
        }
    }

    /// Cache side file names of all backends.
    #[must_use]
    pub fn all_cache_file_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.cache_file_name()).collect()
    }
}

/// A duplicate scanner for one media kind.
pub trait DuplicateBackend {
    /// Which media kind this backend handles.
    fn kind(&self) -> BackendKind;

    /// Whether the scan writes to the real terminal and needs the screen suspended.
    fn takes_over_terminal(&self) -> bool {
        false
    }

    /// Scan `directory` and return its duplicate groups.
    ///
    /// An empty result means no duplicates were found.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the directory cannot be read or the backend
    /// cannot run at all.
    fn scan(
        &self,
        directory: &Path,
        progress: &mut dyn ScanProgress,
    ) -> Result<Vec<ScanRecord>, ScanError>;
}

/// Build the backend for `kind` from configuration.
#[must_use]
pub fn backend_for(kind: BackendKind, config: &Config) -> Box<dyn DuplicateBackend> {
    let threads = resolve_threads(config.scan_threads);
    match kind {
        BackendKind::Image => Box::new(ImageBackend::new(config.image_prefix_bytes, threads)),
        BackendKind::Video => Box::new(VideoBackend::new(config.video_finder.clone(), threads)),
    }
}

/// Worker thread count: the configured value, else all cores but two.
#[must_use]
pub fn resolve_threads(configured: Option<usize>) -> usize {
    if let Some(n) = configured {
        return n.max(1);
    }
    let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    if cores > 2 {
        cores - 2
    } else {
        1
    }
}

/// Parse a line-oriented duplicate listing.
///
/// Groups are separated by blank lines. A `--- ... ---` line starts a new
/// group and names it (a leading `SET: ` is stripped); groups without a
/// header are numbered from 1. Relative paths are resolved against `base`.
/// Groups with fewer than two members are dropped.
pub fn parse_group_lines<I, S>(lines: I, base: &Path) -> Vec<ScanRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    let mut current_id: Option<String> = None;
    let mut current: Vec<PathBuf> = Vec::new();

    for line in lines {
        let line = line.as_ref().trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_group(&mut current_id, &mut current, &mut records);
        } else if let Some(label) = header_label(trimmed) {
            flush_group(&mut current_id, &mut current, &mut records);
            current_id = Some(label.to_string());
        } else {
            let path = Path::new(line);
            current.push(if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            });
        }
    }
    flush_group(&mut current_id, &mut current, &mut records);
    records
}

fn flush_group(id: &mut Option<String>, members: &mut Vec<PathBuf>, records: &mut Vec<ScanRecord>) {
    let label = id.take();
    if members.len() >= 2 {
        let group_id = label.unwrap_or_else(|| (records.len() + 1).to_string());
        records.push(ScanRecord::new(group_id, std::mem::take(members)));
    } else {
        members.clear();
    }
}

fn header_label(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("---")?.strip_suffix("---")?.trim();
    Some(inner.strip_prefix("SET:").map_or(inner, str::trim))
}
