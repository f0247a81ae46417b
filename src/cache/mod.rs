//! Scan result caching.
//!
//! Scanning a large media directory is expensive, so each backend's last
//! result is persisted as a JSON side file inside the scanned directory.
//!
//! # Architecture
//!
//! * [`entry`]: the on-disk format and its freshness check.
//! * [`store`]: lookup, scan-on-miss, and invalidation.
//!
//! # Cache Invalidation
//!
//! An entry is served only while the directory's modification time equals
//! the one recorded with it. Deleting a file through the review screen
//! removes every side file for the reviewed directory; entries are never
//! patched in place. Unreadable or corrupt side files count as misses.

pub mod entry;
pub mod store;

pub use entry::{CacheEntry, CachedGroup};
pub use store::{directory_mtime, CacheError, CacheResult, ScanCache, ScanOutcome};
