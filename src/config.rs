//! Application configuration management.
//!
//! This module handles loading and saving application-wide settings: the
//! programs used to open files, scan tuning, deletion mode, go-to
//! bookmarks, theme and logging. Every field has a default, so a partial
//! (or missing) `config.json` is always usable.

use anyhow::Result;
use directories::{BaseDirs, ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::actions::delete::DeleteMode;
use crate::scanner::image::DEFAULT_PREFIX_BYTES;

/// Preferred color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Detect from the terminal environment
    #[default]
    Auto,
    /// Dark background
    Dark,
    /// Light background
    Light,
}

/// An entry of the go-to menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Mnemonic key
    pub key: char,
    /// Menu label
    pub label: String,
    /// Target directory
    pub path: PathBuf,
}

impl Bookmark {
    fn new(key: char, label: &str, path: PathBuf) -> Self {
        Self {
            key,
            label: label.to_string(),
            path,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Command line used to view images; the path is appended.
    pub image_viewer: Vec<String>,
    /// Command line used to play videos; the path is appended.
    pub video_player: Vec<String>,
    /// Command line used for any other file; the path is appended.
    pub opener: Vec<String>,
    /// Terminal editor for text files. Falls back to `$VISUAL`, `$EDITOR`, then `vim`.
    pub editor: Option<Vec<String>>,
    /// Path to `vid_dup_finder`. Looked up on `PATH` and in `~/.cargo/bin` when unset.
    pub video_finder: Option<PathBuf>,
    /// Scan worker threads. All cores but two when unset.
    pub scan_threads: Option<usize>,
    /// Leading bytes hashed per image.
    pub image_prefix_bytes: usize,
    /// How reviewed files are deleted.
    pub delete_mode: DeleteMode,
    /// Go-to menu entries.
    pub bookmarks: Vec<Bookmark>,
    /// Preferred TUI theme.
    pub theme: ThemeMode,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Log file. Defaults to `dupbrowse.log` in the platform cache directory.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_viewer: vec!["xdg-open".to_string()],
            video_player: vec!["vlc".to_string()],
            opener: vec!["xdg-open".to_string()],
            editor: None,
            video_finder: None,
            scan_threads: None,
            image_prefix_bytes: DEFAULT_PREFIX_BYTES,
            delete_mode: DeleteMode::default(),
            bookmarks: default_bookmarks(),
            theme: ThemeMode::Auto,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Home, Documents, Downloads and the filesystem root.
#[must_use]
pub fn default_bookmarks() -> Vec<Bookmark> {
    let home = BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/"));
    let user_dirs = UserDirs::new();
    let documents = user_dirs
        .as_ref()
        .and_then(|u| u.document_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| home.join("Documents"));
    let downloads = user_dirs
        .as_ref()
        .and_then(|u| u.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| home.join("Downloads"));

    vec![
        Bookmark::new('1', "Home", home),
        Bookmark::new('2', "Documents", documents),
        Bookmark::new('3', "Downloads", downloads),
        Bookmark::new('4', "Root", PathBuf::from("/")),
    ]
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    pub fn load() -> Self {
        let loaded = Self::config_path().and_then(|path| Self::load_from(&path));
        match loaded {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration from `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration to the default platform-specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save the configuration to `path` as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.json"))
    }

    /// Log file path: the configured one, else `dupbrowse.log` in the cache directory.
    #[must_use]
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            project_dirs()
                .ok()
                .map(|dirs| dirs.cache_dir().join("dupbrowse.log"))
        })
    }

    /// Editor command line for text files.
    #[must_use]
    pub fn resolve_editor(&self) -> Vec<String> {
        self.resolve_editor_with(|key| env::var(key).ok())
    }

    /// Editor command line using an arbitrary variable lookup.
    #[must_use]
    pub fn resolve_editor_with<F>(&self, var: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(editor) = self.editor.as_ref().filter(|e| !e.is_empty()) {
            return editor.clone();
        }
        ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|key| var(key))
            .map(|value| {
                value
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .find(|parts| !parts.is_empty())
            .unwrap_or_else(|| vec!["vim".to_string()])
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "dupbrowse", "dupbrowse")
        .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.image_prefix_bytes, 8192);
        assert_eq!(config.delete_mode, DeleteMode::Permanent);
        assert_eq!(config.theme, ThemeMode::Auto);
        let keys: Vec<char> = config.bookmarks.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!['1', '2', '3', '4']);
        assert_eq!(config.bookmarks[3].path, PathBuf::from("/"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"delete_mode": "trash", "scan_threads": 3}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.delete_mode, DeleteMode::Trash);
        assert_eq!(config.scan_threads, Some(3));
        assert_eq!(config.video_player, vec!["vlc".to_string()]);
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.json");
        let config = Config {
            theme: ThemeMode::Light,
            editor: Some(vec!["nano".to_string()]),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_editor_resolution_order() {
        let config = Config::default();
        let env = |pairs: &'static [(&'static str, &'static str)]| {
            move |k: &str| {
                pairs
                    .iter()
                    .find(|(key, _)| *key == k)
                    .map(|(_, v)| v.to_string())
            }
        };

        assert_eq!(config.resolve_editor_with(env(&[])), vec!["vim"]);
        assert_eq!(
            config.resolve_editor_with(env(&[("EDITOR", "nano -w")])),
            vec!["nano", "-w"]
        );
        assert_eq!(
            config.resolve_editor_with(env(&[("EDITOR", "nano"), ("VISUAL", "hx")])),
            vec!["hx"]
        );

        let configured = Config {
            editor: Some(vec!["micro".to_string()]),
            ..Config::default()
        };
        assert_eq!(
            configured.resolve_editor_with(env(&[("VISUAL", "hx")])),
            vec!["micro"]
        );
    }
}
