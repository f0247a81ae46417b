//! Directory-keyed scan cache.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use thiserror::Error;

use super::entry::CacheEntry;
use crate::duplicates::DuplicateGroup;
use crate::scanner::{BackendKind, ScanError, ScanRecord};

/// Errors reading or writing a cache side file.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The side file exists but is not a valid cache entry.
    #[error("corrupt cache file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The side file could not be read or written.
    #[error("cache I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Groups returned by [`ScanCache::get_or_scan`].
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Duplicate groups for the directory
    pub groups: Vec<DuplicateGroup>,
    /// Whether the groups came from a fresh cache entry
    pub from_cache: bool,
}

/// Scan cache stored as side files inside scanned directories.
///
/// Each backend writes its own side file; [`ScanCache::invalidate`] removes
/// all of them.
#[derive(Debug, Clone)]
pub struct ScanCache {
    file_names: Vec<&'static str>,
}

impl Default for ScanCache {
    fn default() -> Self {
        Self::new(BackendKind::all_cache_file_names())
    }
}

/// Modification time of `directory` in seconds since the epoch.
///
/// # Errors
///
/// Returns the I/O error if the directory cannot be stat'ed.
pub fn directory_mtime(directory: &Path) -> io::Result<f64> {
    let modified = fs::metadata(directory)?.modified()?;
    Ok(match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    })
}

impl ScanCache {
    /// Create a cache that knows about these side file names.
    #[must_use]
    pub fn new(file_names: Vec<&'static str>) -> Self {
        Self { file_names }
    }

    /// Location of a side file.
    #[must_use]
    pub fn cache_path(directory: &Path, file_name: &str) -> PathBuf {
        directory.join(file_name)
    }

    /// Read a side file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Corrupt`] for unparsable content and
    /// [`CacheError::Io`] for other read failures.
    pub fn load(&self, directory: &Path, file_name: &str) -> CacheResult<Option<CacheEntry>> {
        let path = Self::cache_path(directory, file_name);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| CacheError::Corrupt { path, source })
    }

    /// Groups from a side file whose mtime matches `current_mtime`.
    ///
    /// Any failure to read or parse is a miss.
    #[must_use]
    pub fn lookup(
        &self,
        directory: &Path,
        file_name: &str,
        current_mtime: f64,
    ) -> Option<Vec<DuplicateGroup>> {
        match self.load(directory, file_name) {
            Ok(Some(entry)) if entry.is_fresh(current_mtime) => {
                if let Some(at) = entry.scanned_at {
                    log::debug!("Cache for {} written {}", directory.display(), at.to_rfc3339());
                }
                Some(entry.to_groups(directory))
            }
            Ok(Some(entry)) => {
                log::debug!(
                    "Stale cache for {} (cached mtime {}, current {})",
                    directory.display(),
                    entry.directory_mtime,
                    current_mtime
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                log::debug!("Treating cache as miss: {}", e);
                None
            }
        }
    }

    /// Persist `groups` for `directory`.
    ///
    /// Creating the side file bumps the directory's mtime, so the recorded
    /// mtime is taken after the file exists and the file is rewritten in
    /// place when it changed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the side file cannot be written.
    pub fn store(
        &self,
        directory: &Path,
        file_name: &str,
        groups: &[DuplicateGroup],
    ) -> CacheResult<()> {
        let path = Self::cache_path(directory, file_name);
        let io_err = |source| CacheError::Io {
            path: path.clone(),
            source,
        };

        let before = directory_mtime(directory).map_err(io_err)?;
        let mut entry = CacheEntry::new(directory, before, groups);
        write_entry(&path, &entry)?;

        let after = directory_mtime(directory).map_err(io_err)?;
        if !entry.is_fresh(after) {
            entry.directory_mtime = after;
            write_entry(&path, &entry)?;
        }
        log::debug!("Wrote cache {}", path.display());
        Ok(())
    }

    /// Return cached groups for `directory`, or run `scan` and cache its result.
    ///
    /// A cache write failure is logged and does not fail the scan.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] if the directory cannot be stat'ed, or the
    /// error from `scan`. The cache is untouched when `scan` fails.
    pub fn get_or_scan<F>(
        &self,
        directory: &Path,
        file_name: &str,
        scan: F,
    ) -> Result<ScanOutcome, ScanError>
    where
        F: FnOnce(&Path) -> Result<Vec<ScanRecord>, ScanError>,
    {
        let mtime = directory_mtime(directory).map_err(|source| ScanError::Io {
            path: directory.to_path_buf(),
            source,
        })?;

        if let Some(groups) = self.lookup(directory, file_name, mtime) {
            log::info!(
                "Cache hit for {} ({} groups)",
                directory.display(),
                groups.len()
            );
            return Ok(ScanOutcome {
                groups,
                from_cache: true,
            });
        }

        log::info!("Cache miss for {}, scanning", directory.display());
        let groups: Vec<DuplicateGroup> = scan(directory)?
            .into_iter()
            .filter_map(DuplicateGroup::from_record)
            .collect();

        if let Err(e) = self.store(directory, file_name, &groups) {
            log::warn!("Could not write scan cache: {}", e);
        }

        Ok(ScanOutcome {
            groups,
            from_cache: false,
        })
    }

    /// Remove every known side file for `directory`.
    ///
    /// Returns the number of files removed.
    pub fn invalidate(&self, directory: &Path) -> usize {
        let mut removed = 0;
        for name in &self.file_names {
            let path = Self::cache_path(directory, name);
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Could not remove cache {}: {}", path.display(), e),
            }
        }
        if removed > 0 {
            log::info!(
                "Invalidated cache for {} ({} files)",
                directory.display(),
                removed
            );
        }
        removed
    }
}

fn write_entry(path: &Path, entry: &CacheEntry) -> CacheResult<()> {
    let json = serde_json::to_string(entry).map_err(|source| CacheError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })
}
