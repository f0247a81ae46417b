//! Scan, review and delete from start to finish.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dupbrowse::actions::delete::DeleteMode;
use dupbrowse::cache::ScanCache;
use dupbrowse::duplicates::ReviewLine;
use dupbrowse::scanner::{BackendKind, DuplicateBackend, ImageBackend, NoProgress};
use dupbrowse::tui::{perform_deletion, App, AppMode, Effect};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn enter() -> KeyEvent {
    KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
}

/// a.jpg and b.jpg share their first 8 KiB; c.jpg does not.
fn media_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let mut shared = vec![7u8; 8192];
    let mut a = shared.clone();
    a.extend_from_slice(b"tail-a");
    shared.extend_from_slice(b"tail-b-longer");
    fs::write(temp.path().join("a.jpg"), a).unwrap();
    fs::write(temp.path().join("b.jpg"), shared).unwrap();
    fs::write(temp.path().join("c.jpg"), vec![9u8; 9000]).unwrap();
    temp
}

fn scan(app: &mut App, cache: &ScanCache, dir: &Path) -> bool {
    let backend = ImageBackend::new(8192, 2);
    let result = cache.get_or_scan(dir, BackendKind::Image.cache_file_name(), |d| {
        backend.scan(d, &mut NoProgress)
    });
    let from_cache = result.as_ref().map(|o| o.from_cache).unwrap_or(false);
    app.finish_scan(dir, result);
    from_cache
}

#[test]
fn test_scan_review_delete_rescan() {
    let temp = media_dir();
    let dir = temp.path();
    let cache = ScanCache::default();
    let mut app = App::new(dir);

    assert!(!scan(&mut app, &cache, dir));
    assert_eq!(app.mode(), AppMode::Reviewing);
    let review = app.review().unwrap();
    assert_eq!(review.groups().len(), 1);
    assert_eq!(review.lines().len(), 4);
    assert!(dir.join(".img_dups_cache").exists());

    app.handle_key(key('j'));
    app.handle_key(enter());
    app.handle_key(key('d'));
    let Effect::Delete(target) = app.handle_key(key('y')) else {
        panic!("expected a delete request");
    };
    assert_eq!(target.path, dir.join("b.jpg"));

    perform_deletion(&mut app, &target, &cache, DeleteMode::Permanent).unwrap();

    assert!(dir.join("a.jpg").exists());
    assert!(!dir.join("b.jpg").exists());
    assert!(dir.join("c.jpg").exists());
    assert!(!dir.join(".img_dups_cache").exists());

    let review = app.review().unwrap();
    assert_eq!(review.deleted_count(), 1);
    assert_eq!(review.lines().len(), 4);
    let line = &review.lines()[target.line_index];
    assert!(matches!(line, ReviewLine::Member { tombstoned: true, .. }));
    assert_eq!(
        line.text(),
        format!("--- DELETED: {} ---", dir.join("b.jpg").display())
    );

    app.handle_key(key('q'));
    assert_eq!(app.mode(), AppMode::Browsing);

    assert!(!scan(&mut app, &cache, dir));
    assert_eq!(app.mode(), AppMode::Browsing);
    assert_eq!(app.status(), Some("No duplicates found."));
}

#[test]
fn test_second_scan_uses_cache() {
    let temp = media_dir();
    let dir = temp.path();
    let cache = ScanCache::default();
    let mut app = App::new(dir);

    assert!(!scan(&mut app, &cache, dir));
    app.handle_key(key('q'));
    assert!(scan(&mut app, &cache, dir));
    assert_eq!(app.review().unwrap().groups().len(), 1);
}

#[test]
fn test_deleting_tombstone_is_silent() {
    let temp = media_dir();
    let dir = temp.path();
    let cache = ScanCache::default();
    let mut app = App::new(dir);
    scan(&mut app, &cache, dir);

    app.handle_key(enter());
    app.handle_key(key('d'));
    let Effect::Delete(target) = app.handle_key(key('y')) else {
        panic!("expected a delete request");
    };
    perform_deletion(&mut app, &target, &cache, DeleteMode::Permanent).unwrap();

    // The tombstone stays selectable and skips the confirmation
    app.handle_key(enter());
    let Effect::Delete(again) = app.handle_key(key('d')) else {
        panic!("tombstone delete should not confirm");
    };
    assert!(again.tombstoned);
    let err = perform_deletion(&mut app, &again, &cache, DeleteMode::Permanent).unwrap_err();
    assert!(err.is_silent());
    assert_eq!(app.review().unwrap().deleted_count(), 1);
}

fn write_pair(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("a.jpg"), vec![3u8; 4096]).unwrap();
    fs::write(dir.join("b.jpg"), vec![3u8; 4096]).unwrap();
}

#[test]
fn test_delete_drops_ancestor_caches() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let sub = root.join("sub");
    write_pair(&sub);
    let cache = ScanCache::default();
    let mut app = App::new(root);

    // Both the parent and the child have a cached result listing sub/b.jpg
    scan(&mut app, &cache, root);
    app.handle_key(key('q'));
    scan(&mut app, &cache, &sub);
    assert_eq!(app.review().unwrap().base_directory(), sub.as_path());

    app.handle_key(key('j'));
    app.handle_key(enter());
    app.handle_key(key('d'));
    let Effect::Delete(target) = app.handle_key(key('y')) else {
        panic!("expected a delete request");
    };
    perform_deletion(&mut app, &target, &cache, DeleteMode::Permanent).unwrap();

    assert!(!root.join(".img_dups_cache").exists());
    assert!(!sub.join(".img_dups_cache").exists());

    app.handle_key(key('q'));
    assert!(!scan(&mut app, &cache, root));
    assert_eq!(app.status(), Some("No duplicates found."));
}

#[test]
fn test_delete_drops_intermediate_caches() {
    let temp = TempDir::new().unwrap();
    let top = temp.path();
    let middle = top.join("a");
    let leaf = middle.join("b");
    write_pair(&leaf);
    let cache = ScanCache::default();
    let mut app = App::new(top);

    scan(&mut app, &cache, &middle);
    app.handle_key(key('q'));
    scan(&mut app, &cache, top);
    assert_eq!(app.review().unwrap().base_directory(), top);

    app.handle_key(enter());
    app.handle_key(key('d'));
    let Effect::Delete(target) = app.handle_key(key('y')) else {
        panic!("expected a delete request");
    };
    assert_eq!(target.path, leaf.join("a.jpg"));
    perform_deletion(&mut app, &target, &cache, DeleteMode::Permanent).unwrap();

    assert!(!middle.join(".img_dups_cache").exists());
    assert!(!top.join(".img_dups_cache").exists());

    app.handle_key(key('q'));
    assert!(!scan(&mut app, &cache, &middle));
    assert_eq!(app.status(), Some("No duplicates found."));
}
