//! Image duplicate backend.
//!
//! # Overview
//!
//! Walks the scanned directory recursively, hashes the first
//! `prefix_bytes` of every image with BLAKE3 and groups files whose prefix
//! hashes match. Hashing runs on a dedicated rayon pool; progress is
//! reported from the calling thread between chunks.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::{BackendKind, DuplicateBackend, ScanError, ScanProgress, ScanRecord};

/// Extensions recognised as images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff"];

/// Default number of leading bytes hashed per image.
pub const DEFAULT_PREFIX_BYTES: usize = 8192;

/// Files hashed between two progress reports.
pub const PROGRESS_INTERVAL: usize = 25;

/// Content-prefix image scanner.
#[derive(Debug, Clone)]
pub struct ImageBackend {
    prefix_bytes: usize,
    threads: usize,
}

impl Default for ImageBackend {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX_BYTES, 1)
    }
}

impl ImageBackend {
    /// Create a backend hashing `prefix_bytes` per file on `threads` workers.
    #[must_use]
    pub fn new(prefix_bytes: usize, threads: usize) -> Self {
        Self {
            prefix_bytes: prefix_bytes.max(1),
            threads: threads.max(1),
        }
    }
}

/// Whether `path` has an image extension.
#[must_use]
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Collect image files under `directory`, sorted by file name at each level.
///
/// # Errors
///
/// Returns [`ScanError::Io`] if `directory` itself cannot be read.
/// Unreadable subdirectories are skipped.
pub fn collect_images(directory: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut images = Vec::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory loop"));
                return Err(ScanError::Io {
                    path: directory.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                log::debug!("Skipping during image walk: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_image(entry.path()) {
            images.push(entry.into_path());
        }
    }
    Ok(images)
}

/// BLAKE3 hex digest of at most `limit` leading bytes of `path`.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be opened or read.
pub fn prefix_hash(path: &Path, limit: usize) -> io::Result<String> {
    let file = File::open(path)?;
    let mut buf = Vec::with_capacity(limit);
    file.take(limit as u64).read_to_end(&mut buf)?;
    Ok(blake3::hash(&buf).to_hex().to_string())
}

impl DuplicateBackend for ImageBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Image
    }

    fn scan(
        &self,
        directory: &Path,
        progress: &mut dyn ScanProgress,
    ) -> Result<Vec<ScanRecord>, ScanError> {
        progress.message("Scanning images...");
        let images = collect_images(directory)?;
        let total = images.len();
        log::info!("Hashing {} images under {}", total, directory.display());
        if total == 0 {
            return Ok(Vec::new());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| ScanError::Failed(e.to_string()))?;

        let mut order: Vec<String> = Vec::new();
        let mut by_hash: HashMap<String, Vec<PathBuf>> = HashMap::new();

        for (chunk_index, chunk) in images.chunks(PROGRESS_INTERVAL).enumerate() {
            progress.progress(chunk_index * PROGRESS_INTERVAL, total);

            let hashes: Vec<Option<String>> = pool.install(|| {
                chunk
                    .par_iter()
                    .map(|path| match prefix_hash(path, self.prefix_bytes) {
                        Ok(h) => Some(h),
                        Err(e) => {
                            log::debug!("Skipping unreadable image {}: {}", path.display(), e);
                            None
                        }
                    })
                    .collect()
            });

            for (path, hash) in chunk.iter().zip(hashes) {
                let Some(hash) = hash else { continue };
                by_hash
                    .entry(hash)
                    .or_insert_with_key(|key| {
                        order.push(key.clone());
                        Vec::new()
                    })
                    .push(path.clone());
            }
        }
        progress.progress(total, total);

        let records: Vec<ScanRecord> = order
            .into_iter()
            .filter_map(|hash| {
                let paths = by_hash.remove(&hash)?;
                (paths.len() >= 2).then(|| ScanRecord::new(hash, paths))
            })
            .collect();

        log::info!(
            "Image scan of {} found {} duplicate groups",
            directory.display(),
            records.len()
        );
        Ok(records)
    }
}
