//! Scan cache behavior against real directories.

use dupbrowse::cache::{directory_mtime, ScanCache};
use dupbrowse::duplicates::DuplicateGroup;
use dupbrowse::scanner::{BackendKind, ScanError, ScanRecord};
use filetime::{set_file_mtime, FileTime};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const IMG: &str = ".img_dups_cache";
const VID: &str = ".vid_dups_cache";

fn pair(dir: &Path) -> Vec<ScanRecord> {
    vec![ScanRecord::new(
        "h1",
        vec![dir.join("a.jpg"), dir.join("b.jpg")],
    )]
}

#[test]
fn test_second_request_is_served_from_cache() {
    let temp = TempDir::new().unwrap();
    let cache = ScanCache::default();
    let runs = Cell::new(0);

    let first = cache
        .get_or_scan(temp.path(), IMG, |dir| {
            runs.set(runs.get() + 1);
            Ok(pair(dir))
        })
        .unwrap();
    assert!(!first.from_cache);
    assert_eq!(first.groups.len(), 1);
    assert!(temp.path().join(IMG).exists());

    let second = cache
        .get_or_scan(temp.path(), IMG, |dir| {
            runs.set(runs.get() + 1);
            Ok(pair(dir))
        })
        .unwrap();
    assert!(second.from_cache);
    assert_eq!(runs.get(), 1);
    assert_eq!(second.groups, first.groups);
}

#[test]
fn test_changed_directory_mtime_forces_rescan() {
    let temp = TempDir::new().unwrap();
    let cache = ScanCache::default();
    cache.get_or_scan(temp.path(), IMG, |dir| Ok(pair(dir))).unwrap();

    set_file_mtime(temp.path(), FileTime::from_unix_time(1_000_000_000, 0)).unwrap();

    let runs = Cell::new(0);
    let outcome = cache
        .get_or_scan(temp.path(), IMG, |_| {
            runs.set(runs.get() + 1);
            Ok(Vec::new())
        })
        .unwrap();
    assert_eq!(runs.get(), 1);
    assert!(!outcome.from_cache);
    assert!(outcome.groups.is_empty());
}

#[test]
fn test_new_file_in_directory_forces_rescan() {
    let temp = TempDir::new().unwrap();
    let cache = ScanCache::default();
    cache.get_or_scan(temp.path(), IMG, |dir| Ok(pair(dir))).unwrap();

    let before = directory_mtime(temp.path()).unwrap();
    fs::write(temp.path().join("new.jpg"), "n").unwrap();
    // Coarse filesystem timestamps may not move within the same tick
    if (directory_mtime(temp.path()).unwrap() - before).abs() < 1e-6 {
        set_file_mtime(temp.path(), FileTime::from_unix_time(1_000_000_000, 0)).unwrap();
    }

    let outcome = cache.get_or_scan(temp.path(), IMG, |_| Ok(Vec::new())).unwrap();
    assert!(!outcome.from_cache);
}

#[test]
fn test_corrupt_cache_is_a_miss() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(IMG), "{ not json").unwrap();
    let cache = ScanCache::default();

    assert!(cache.load(temp.path(), IMG).is_err());
    let outcome = cache.get_or_scan(temp.path(), IMG, |dir| Ok(pair(dir))).unwrap();
    assert!(!outcome.from_cache);

    // The bad file was replaced by a readable entry
    assert!(cache.load(temp.path(), IMG).unwrap().is_some());
}

#[test]
fn test_line_oriented_cache_is_read() {
    let temp = TempDir::new().unwrap();
    let json = r#"{"mtime": 1500000000.0, "lines": ["--- SET: 1 ---", "a.mp4", "sub/b.mp4", ""]}"#;
    fs::write(temp.path().join(VID), json).unwrap();
    set_file_mtime(temp.path(), FileTime::from_unix_time(1_500_000_000, 0)).unwrap();

    let cache = ScanCache::default();
    let outcome = cache
        .get_or_scan(temp.path(), VID, |_| -> Result<Vec<ScanRecord>, ScanError> {
            panic!("fresh cache must not rescan")
        })
        .unwrap();

    assert!(outcome.from_cache);
    let expected = DuplicateGroup::new(
        "1",
        vec![temp.path().join("a.mp4"), temp.path().join("sub").join("b.mp4")],
    )
    .unwrap();
    assert_eq!(outcome.groups, vec![expected]);
}

#[test]
fn test_failed_scan_leaves_cache_alone() {
    let temp = TempDir::new().unwrap();
    let cache = ScanCache::default();

    let result = cache.get_or_scan(temp.path(), IMG, |_| Err(ScanError::Failed("boom".into())));
    assert!(result.is_err());
    assert!(!temp.path().join(IMG).exists());
}

#[test]
fn test_invalidate_removes_every_backend_file() {
    let temp = TempDir::new().unwrap();
    let cache = ScanCache::default();
    for kind in BackendKind::ALL {
        cache
            .store(temp.path(), kind.cache_file_name(), &[])
            .unwrap();
    }

    assert_eq!(cache.invalidate(temp.path()), 2);
    assert!(!temp.path().join(IMG).exists());
    assert!(!temp.path().join(VID).exists());
    assert_eq!(cache.invalidate(temp.path()), 0);
}

#[test]
fn test_missing_directory_is_an_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("gone");
    let cache = ScanCache::default();

    let result = cache.get_or_scan(&missing, IMG, |dir| Ok(pair(dir)));
    assert!(matches!(result, Err(ScanError::Io { .. })));
}
