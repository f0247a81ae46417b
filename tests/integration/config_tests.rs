//! Configuration files feeding the rest of the application.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dupbrowse::actions::delete::DeleteMode;
use dupbrowse::config::{Config, ThemeMode};
use dupbrowse::scanner::{backend_for, BackendKind, DuplicateBackend};
use dupbrowse::tui::{App, Theme};
use std::fs;
use tempfile::TempDir;

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

#[test]
fn test_bookmarks_from_file_drive_goto_menu() {
    let temp = TempDir::new().unwrap();
    let media = temp.path().join("media");
    fs::create_dir(&media).unwrap();
    let config_path = temp.path().join("config.json");
    let json = serde_json::json!({
        "bookmarks": [{ "key": "m", "label": "Media", "path": media }]
    });
    fs::write(&config_path, json.to_string()).unwrap();

    let config = Config::load_from(&config_path).unwrap();
    assert_eq!(config.bookmarks.len(), 1);
    assert_eq!(config.video_player, Config::default().video_player);

    let mut app = App::new(temp.path()).with_bookmarks(config.bookmarks);
    app.handle_key(key('g'));
    assert!(!app.modal().is_idle());
    app.handle_key(key('m'));
    app.refresh();

    assert!(app.modal().is_idle());
    assert!(app.nav().current_path().ends_with("media"));
    assert_eq!(app.nav().history().len(), 1);
}

#[test]
fn test_saved_config_round_trips_through_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.json");
    let config = Config {
        video_player: vec!["mpv".into(), "--fs".into()],
        delete_mode: DeleteMode::Trash,
        theme: ThemeMode::Light,
        scan_threads: Some(3),
        ..Config::default()
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.video_player, vec!["mpv", "--fs"]);
    assert_eq!(loaded.delete_mode, DeleteMode::Trash);
    assert_eq!(loaded.scan_threads, Some(3));
    assert!(Theme::from_mode(loaded.theme).is_light());
}

#[test]
fn test_backends_built_from_config() {
    let config = Config {
        video_finder: Some("/nonexistent/vid_dup_finder".into()),
        ..Config::default()
    };

    let image = backend_for(BackendKind::Image, &config);
    assert_eq!(image.kind(), BackendKind::Image);
    assert!(!image.takes_over_terminal());

    let video = backend_for(BackendKind::Video, &config);
    assert_eq!(video.kind(), BackendKind::Video);
    assert!(video.takes_over_terminal());
}

#[test]
fn test_unknown_keys_are_ignored() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, r#"{"log_level": "debug", "something_else": 1}"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.log_level, "debug");
}
