//! Backends run against real directory trees.

use dupbrowse::scanner::image::collect_images;
use dupbrowse::scanner::{
    parse_group_lines, DuplicateBackend, ImageBackend, NoProgress, ScanError, VideoBackend,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_with_prefix(path: &Path, prefix: u8, tail: &str) {
    let mut bytes = vec![prefix; 8192];
    bytes.extend_from_slice(tail.as_bytes());
    fs::write(path, bytes).unwrap();
}

#[test]
fn test_image_scan_groups_by_prefix() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::create_dir(dir.join("sub")).unwrap();
    write_with_prefix(&dir.join("a.jpg"), 1, "first");
    write_with_prefix(&dir.join("sub").join("copy.PNG"), 1, "second");
    write_with_prefix(&dir.join("c.jpg"), 2, "");
    write_with_prefix(&dir.join("notes.txt"), 1, "");

    let records = ImageBackend::new(8192, 2).scan(dir, &mut NoProgress).unwrap();

    assert_eq!(records.len(), 1);
    let mut members = records[0].member_paths.clone();
    members.sort();
    assert_eq!(members, vec![dir.join("a.jpg"), dir.join("sub").join("copy.PNG")]);
}

#[test]
fn test_image_scan_without_duplicates() {
    let temp = TempDir::new().unwrap();
    write_with_prefix(&temp.path().join("a.jpg"), 1, "");
    write_with_prefix(&temp.path().join("b.jpg"), 2, "");

    let records = ImageBackend::new(8192, 1)
        .scan(temp.path(), &mut NoProgress)
        .unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_image_scan_missing_directory() {
    let temp = TempDir::new().unwrap();
    let result = ImageBackend::new(8192, 1).scan(&temp.path().join("nope"), &mut NoProgress);
    assert!(matches!(result, Err(ScanError::Io { .. })));
}

#[test]
fn test_collect_images_skips_other_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("b.webp"), "x").unwrap();
    fs::write(temp.path().join("a.gif"), "x").unwrap();
    fs::write(temp.path().join("clip.mp4"), "x").unwrap();

    let found: Vec<PathBuf> = collect_images(temp.path()).unwrap();
    assert_eq!(
        found,
        vec![temp.path().join("a.gif"), temp.path().join("b.webp")]
    );
}

#[test]
fn test_video_backend_without_finder() {
    let temp = TempDir::new().unwrap();
    let backend = VideoBackend::new(Some(temp.path().join("bin").join("vid_dup_finder")), 1);

    assert!(backend.takes_over_terminal());
    let err = backend.scan(temp.path(), &mut NoProgress).unwrap_err();
    assert!(matches!(err, ScanError::BackendUnavailable { backend: "video", .. }));
}

#[cfg(unix)]
#[test]
fn test_video_backend_parses_finder_output() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let finder = temp.path().join("fake_finder");
    fs::write(
        &finder,
        "#!/bin/sh\necho 'one.mp4'\necho 'two.mp4'\necho ''\necho 'lonely.mp4'\necho ''\n",
    )
    .unwrap();
    fs::set_permissions(&finder, fs::Permissions::from_mode(0o755)).unwrap();

    let media = temp.path().join("media");
    fs::create_dir(&media).unwrap();
    let records = VideoBackend::new(Some(finder), 1)
        .scan(&media, &mut NoProgress)
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].group_id, "1");
    assert_eq!(
        records[0].member_paths,
        vec![media.join("one.mp4"), media.join("two.mp4")]
    );
}

#[test]
fn test_parse_group_lines_headers_and_numbering() {
    let base = Path::new("/videos");
    let lines = [
        "--- SET: deadbeef ---",
        "/videos/a.mkv",
        "/videos/b.mkv",
        "",
        "c.mkv",
        "d/e.mkv",
        "",
        "single.mkv",
    ];

    let records = parse_group_lines(lines, base);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].group_id, "deadbeef");
    assert_eq!(records[1].group_id, "2");
    assert_eq!(
        records[1].member_paths,
        vec![base.join("c.mkv"), base.join("d").join("e.mkv")]
    );
}
