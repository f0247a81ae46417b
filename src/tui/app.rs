//! TUI application state management.
//!
//! # Overview
//!
//! [`App`] is the central state container for the interactive screen:
//! - Current mode (Browsing, Reviewing, Quitting)
//! - Browser navigation state
//! - The review session, while one is open
//! - The modal menu/prompt state
//! - A transient status message
//!
//! # Architecture
//!
//! `App` is a pure state machine. Keys go in through [`App::handle_key`];
//! anything that touches the outside world (scanning, launching a program,
//! deleting a file) comes back out as an [`Effect`] for the event loop to
//! perform. The loop then reports results back through
//! [`App::finish_scan`], [`App::set_status`] and friends.
//!
//! # Example
//!
//! ```no_run
//! use dupbrowse::tui::{App, AppMode, Effect};
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//! use std::path::Path;
//!
//! let mut app = App::new(Path::new("/tmp"));
//! let effect = app.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
//! assert_eq!(effect, Effect::None);
//! assert_eq!(app.mode(), AppMode::Browsing);
//! ```

use std::path::{Path, PathBuf};

use crossterm::event::KeyEvent;

use super::keybindings::{modal_key, KeyBindings};
use super::theme::Theme;
use crate::actions::menu::{Menu, Modal, ModalOutcome};
use crate::actions::open::MediaKind;
use crate::browser::{EnterOutcome, EntryKind, NavigationState};
use crate::cache::ScanOutcome;
use crate::config::{default_bookmarks, Bookmark};
use crate::duplicates::{build_review, Direction, DuplicateGroup, ReviewState, ReviewTarget};
use crate::scanner::{BackendKind, ScanError};

/// Application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Navigating the filesystem
    #[default]
    Browsing,
    /// Reviewing the duplicate groups of a scanned directory
    Reviewing,
    /// Application is quitting
    Quitting,
}

impl AppMode {
    /// Check if the application is done (quitting).
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Quitting)
    }
}

/// User action triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move the selection up (wraps)
    NavigateUp,
    /// Move the selection down (wraps)
    NavigateDown,
    /// Enter a directory or open a file (`l`/Right)
    Enter,
    /// Open the action menu for the selection (Enter)
    Activate,
    /// Go to the parent directory, or leave the review (`h`/Left)
    Parent,
    /// Show or hide dotfiles
    ToggleHidden,
    /// Open the go-to menu
    GoTo,
    /// Return to the previous directory
    GoBack,
    /// Quit, or leave the review
    Quit,
    /// Exit the program from any screen (Ctrl-C)
    Interrupt,
}

/// What a menu option does once chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Scan a directory with one backend
    Scan {
        /// Directory to scan
        directory: PathBuf,
        /// Backend to use
        kind: BackendKind,
    },
    /// Open a file with its viewer, player or editor
    Open(PathBuf),
    /// Delete a reviewed member (asks for confirmation first)
    Delete(ReviewTarget),
    /// Jump to a bookmarked directory
    GoTo(PathBuf),
    /// Pop the directory history
    GoBack,
}

/// Side effect requested by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing beyond the state change
    None,
    /// Run a scan (through the cache) and report it with [`App::finish_scan`]
    Scan {
        /// Directory to scan
        directory: PathBuf,
        /// Backend to use
        kind: BackendKind,
    },
    /// Open a file
    Open(PathBuf),
    /// Delete a reviewed member
    Delete(ReviewTarget),
}

/// TUI application state.
///
/// Not thread-safe; only the main thread touches it.
#[derive(Debug)]
pub struct App {
    /// Current application mode
    mode: AppMode,
    /// Browser state
    nav: NavigationState,
    /// Open review session
    review: Option<ReviewState>,
    /// Menu or prompt owning input
    modal: Modal<MenuAction>,
    /// Transient message; the next key dismisses it
    status: Option<String>,
    /// Go-to menu entries
    bookmarks: Vec<Bookmark>,
    /// Header banner
    banner: String,
    /// Color palette
    theme: Theme,
    /// Key map
    bindings: KeyBindings,
}

impl App {
    /// Create an App browsing `start`.
    #[must_use]
    pub fn new(start: &Path) -> Self {
        Self {
            mode: AppMode::Browsing,
            nav: NavigationState::new(start),
            review: None,
            modal: Modal::Idle,
            status: None,
            bookmarks: default_bookmarks(),
            banner: String::new(),
            theme: Theme::default(),
            bindings: KeyBindings::default(),
        }
    }

    /// Replace the go-to menu entries.
    #[must_use]
    pub fn with_bookmarks(mut self, bookmarks: Vec<Bookmark>) -> Self {
        self.bookmarks = bookmarks;
        self
    }

    /// Set the header banner.
    #[must_use]
    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = banner.into();
        self
    }

    /// Set the color palette.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    // ==================== Accessors ====================

    /// Get the current application mode.
    #[must_use]
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Set the application mode.
    pub fn set_mode(&mut self, mode: AppMode) {
        log::debug!("Mode transition: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    /// Check if the application should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.mode.is_done()
    }

    /// Browser state.
    #[must_use]
    pub fn nav(&self) -> &NavigationState {
        &self.nav
    }

    /// Open review session, if any.
    #[must_use]
    pub fn review(&self) -> Option<&ReviewState> {
        self.review.as_ref()
    }

    /// Mutable review session, if any.
    pub fn review_mut(&mut self) -> Option<&mut ReviewState> {
        self.review.as_mut()
    }

    /// Menu or prompt state.
    #[must_use]
    pub fn modal(&self) -> &Modal<MenuAction> {
        &self.modal
    }

    /// Current status message.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Header banner.
    #[must_use]
    pub fn banner(&self) -> &str {
        &self.banner
    }

    /// Color palette.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Key map.
    #[must_use]
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    // ==================== Status ====================

    /// Show a transient message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("Status: {}", message);
        self.status = Some(message);
    }

    /// Show an error as a transient message.
    pub fn set_error(&mut self, message: &str) {
        log::error!("App error: {}", message);
        self.status = Some(message.to_string());
    }

    /// Dismiss the status message.
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // ==================== Screen ====================

    /// Re-list the browser directory if it changed.
    pub fn refresh(&mut self) {
        self.nav.refresh();
    }

    /// Set the number of list rows on screen.
    pub fn set_viewport_height(&mut self, rows: usize) {
        self.nav.set_viewport_height(rows);
        if let Some(review) = self.review.as_mut() {
            review.set_viewport_height(rows);
        }
    }

    // ==================== Review ====================

    /// Open a review session over `groups`.
    pub fn start_review(&mut self, groups: Vec<DuplicateGroup>, directory: &Path) {
        log::info!(
            "Reviewing {} duplicate groups in {}",
            groups.len(),
            directory.display()
        );
        self.review = Some(build_review(groups, directory));
        self.set_mode(AppMode::Reviewing);
    }

    /// Report a finished scan.
    ///
    /// Failures and empty results become a status message; anything else
    /// opens the review.
    pub fn finish_scan(&mut self, directory: &Path, result: Result<ScanOutcome, ScanError>) {
        match result {
            Ok(outcome) if outcome.groups.is_empty() => {
                log::info!("No duplicates in {}", directory.display());
                self.set_status("No duplicates found.");
            }
            Ok(outcome) => {
                if outcome.from_cache {
                    log::debug!("Review served from cache");
                }
                self.start_review(outcome.groups, directory);
            }
            Err(e) => self.set_error(&format!("Scan failed: {e}")),
        }
    }

    /// Close the review and return to the browser, re-listing the directory.
    pub fn leave_review(&mut self) {
        if let Some(review) = self.review.take() {
            log::debug!(
                "Leaving review of {} ({} deleted)",
                review.base_directory().display(),
                review.deleted_count()
            );
        }
        self.modal.close();
        self.nav.mark_stale();
        self.set_mode(AppMode::Browsing);
    }

    // ==================== Input ====================

    /// Handle one key press.
    ///
    /// A visible status message swallows the key. An open menu or prompt
    /// gets the key before the normal bindings.
    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        if self.bindings.resolve(&key) == Some(Action::Interrupt) {
            log::info!("Interrupted by Ctrl-C");
            self.modal.close();
            self.status = None;
            self.set_mode(AppMode::Quitting);
            return Effect::None;
        }

        if self.status.take().is_some() {
            return Effect::None;
        }

        if !self.modal.is_idle() {
            return match self.modal.handle(modal_key(&key)) {
                ModalOutcome::Pending | ModalOutcome::Cancelled => Effect::None,
                ModalOutcome::Chosen(action) => self.apply_choice(action),
                ModalOutcome::Confirmed(action) => self.apply_confirmed(action),
            };
        }

        match self.bindings.resolve(&key) {
            Some(action) => self.handle_action(action),
            None => {
                log::trace!("Unbound key: {:?}", key.code);
                Effect::None
            }
        }
    }

    /// Handle a user action in the current mode.
    pub fn handle_action(&mut self, action: Action) -> Effect {
        log::trace!("Handling action: {:?} in mode {:?}", action, self.mode);
        match self.mode {
            AppMode::Browsing => self.browse_action(action),
            AppMode::Reviewing => self.review_action(action),
            AppMode::Quitting => Effect::None,
        }
    }

    fn browse_action(&mut self, action: Action) -> Effect {
        match action {
            Action::NavigateUp => self.nav.move_up(),
            Action::NavigateDown => self.nav.move_down(),
            Action::Enter => {
                if let EnterOutcome::File(path) = self.nav.enter_selected() {
                    return self.open_file_menu(path);
                }
            }
            Action::Activate => {
                let Some(entry) = self.nav.selected_entry().cloned() else {
                    return Effect::None;
                };
                match entry.kind {
                    EntryKind::Directory => self.open_folder_menu(entry.path),
                    EntryKind::File => return self.open_file_menu(entry.path),
                    EntryKind::Parent | EntryKind::Unreadable => {
                        self.nav.enter(&entry);
                    }
                }
            }
            Action::Parent => {
                self.nav.go_up();
            }
            Action::ToggleHidden => self.nav.toggle_hidden(),
            Action::GoTo => self.open_goto_menu(),
            Action::GoBack => {
                self.nav.go_back();
            }
            Action::Quit | Action::Interrupt => self.set_mode(AppMode::Quitting),
        }
        Effect::None
    }

    fn review_action(&mut self, action: Action) -> Effect {
        match action {
            Action::NavigateUp => {
                if let Some(review) = self.review.as_mut() {
                    review.move_selection(Direction::Up);
                }
            }
            Action::NavigateDown => {
                if let Some(review) = self.review.as_mut() {
                    review.move_selection(Direction::Down);
                }
            }
            Action::Enter | Action::Activate => self.open_review_menu(),
            Action::Parent | Action::Quit => self.leave_review(),
            Action::Interrupt => self.set_mode(AppMode::Quitting),
            Action::ToggleHidden | Action::GoTo | Action::GoBack => {}
        }
        Effect::None
    }

    fn apply_choice(&mut self, action: MenuAction) -> Effect {
        match action {
            MenuAction::Scan { directory, kind } => Effect::Scan { directory, kind },
            MenuAction::Open(path) => Effect::Open(path),
            MenuAction::Delete(target) if target.tombstoned => Effect::Delete(target),
            MenuAction::Delete(target) => {
                let name = target
                    .path
                    .file_name()
                    .map_or_else(|| target.path.display().to_string(), |n| {
                        n.to_string_lossy().into_owned()
                    });
                self.modal
                    .confirm(format!("Delete: {name}?"), MenuAction::Delete(target));
                Effect::None
            }
            MenuAction::GoTo(path) => {
                self.nav.go_to(&path);
                Effect::None
            }
            MenuAction::GoBack => {
                self.nav.go_back();
                Effect::None
            }
        }
    }

    fn apply_confirmed(&mut self, action: MenuAction) -> Effect {
        match action {
            MenuAction::Delete(target) => Effect::Delete(target),
            other => self.apply_choice(other),
        }
    }

    // ==================== Menus ====================

    fn open_folder_menu(&mut self, directory: PathBuf) {
        let menu = Menu::new("Folder Action:")
            .option(
                'i',
                "Scan images",
                MenuAction::Scan {
                    directory: directory.clone(),
                    kind: BackendKind::Image,
                },
            )
            .option(
                'v',
                "Scan videos",
                MenuAction::Scan {
                    directory,
                    kind: BackendKind::Video,
                },
            )
            .with_cancel();
        self.modal.open_menu(menu);
    }

    fn open_file_menu(&mut self, path: PathBuf) -> Effect {
        let label = match MediaKind::of(&path) {
            MediaKind::Video => "Play",
            MediaKind::Text => "View in editor",
            MediaKind::Image => "View image",
            MediaKind::Other => return Effect::Open(path),
        };
        self.modal.open_menu(
            Menu::new("File Action:")
                .option('v', label, MenuAction::Open(path))
                .with_cancel(),
        );
        Effect::None
    }

    fn open_review_menu(&mut self) {
        let Some(target) = self.review.as_ref().and_then(ReviewState::selected_target) else {
            return;
        };
        let view_label = if MediaKind::of(&target.path) == MediaKind::Video {
            "Play"
        } else {
            "View"
        };
        let menu = Menu::new("Action:")
            .option('v', view_label, MenuAction::Open(target.path.clone()))
            .option('d', "Delete", MenuAction::Delete(target))
            .with_cancel();
        self.modal.open_menu(menu);
    }

    fn open_goto_menu(&mut self) {
        let mut menu = Menu::new("Go To:");
        for bookmark in &self.bookmarks {
            menu = menu.option(
                bookmark.key,
                bookmark.label.clone(),
                MenuAction::GoTo(bookmark.path.clone()),
            );
        }
        if !self.nav.history().is_empty() {
            menu = menu.option('b', "Go Back", MenuAction::GoBack);
        }
        self.modal.open_menu(menu.with_cancel());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::menu::Modal;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::fs;
    use tempfile::TempDir;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fixture() -> (TempDir, App) {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("photos")).unwrap();
        fs::write(temp.path().join("notes.txt"), "hi").unwrap();
        fs::write(temp.path().join("clip.mp4"), "v").unwrap();
        fs::write(temp.path().join("data.bin"), "x").unwrap();
        let app = App::new(temp.path());
        (temp, app)
    }

    fn select_named(app: &mut App, name: &str) {
        let target = app
            .nav()
            .entries()
            .iter()
            .position(|e| e.name == name)
            .unwrap();
        while app.nav().selection_index() != target {
            app.handle_action(Action::NavigateDown);
        }
    }

    fn review_app(temp: &TempDir) -> App {
        let a = temp.path().join("a.jpg");
        let b = temp.path().join("b.jpg");
        fs::write(&a, "same").unwrap();
        fs::write(&b, "same").unwrap();
        let mut app = App::new(temp.path());
        let group = DuplicateGroup::new("g1", vec![a, b]).unwrap();
        app.start_review(vec![group], temp.path());
        app
    }

    #[test]
    fn test_starts_browsing() {
        let (_temp, app) = fixture();
        assert_eq!(app.mode(), AppMode::Browsing);
        assert!(app.modal().is_idle());
        assert!(app.status().is_none());
    }

    #[test]
    fn test_quit() {
        let (_temp, mut app) = fixture();
        assert_eq!(app.handle_key(key('q')), Effect::None);
        assert!(app.should_quit());
    }

    #[test]
    fn test_activate_directory_opens_folder_menu() {
        let (_temp, mut app) = fixture();
        select_named(&mut app, "photos");
        app.handle_key(code(KeyCode::Enter));
        let Modal::MenuOpen(menu) = app.modal() else {
            panic!("expected folder menu");
        };
        assert_eq!(menu.title, "Folder Action:");
        assert_eq!(menu.options().len(), 3);

        let effect = app.handle_key(key('i'));
        assert_eq!(
            effect,
            Effect::Scan {
                directory: app.nav().current_path().join("photos"),
                kind: BackendKind::Image
            }
        );
        assert!(app.modal().is_idle());
    }

    #[test]
    fn test_enter_key_l_enters_directory() {
        let (_temp, mut app) = fixture();
        select_named(&mut app, "photos");
        app.handle_key(key('l'));
        app.refresh();
        assert!(app.nav().current_path().ends_with("photos"));
        assert!(app.modal().is_idle());
    }

    #[test]
    fn test_file_menus_by_kind() {
        let (_temp, mut app) = fixture();
        select_named(&mut app, "clip.mp4");
        app.handle_key(key('l'));
        let Modal::MenuOpen(menu) = app.modal() else {
            panic!("expected file menu");
        };
        assert_eq!(menu.options()[0].display(), "[v] Play");
        app.handle_key(code(KeyCode::Esc));

        select_named(&mut app, "notes.txt");
        app.handle_key(code(KeyCode::Enter));
        let Modal::MenuOpen(menu) = app.modal() else {
            panic!("expected file menu");
        };
        assert_eq!(menu.options()[0].display(), "[v] View in editor");
        let effect = app.handle_key(code(KeyCode::Enter));
        assert!(matches!(effect, Effect::Open(p) if p.ends_with("notes.txt")));
    }

    #[test]
    fn test_other_file_opens_directly() {
        let (_temp, mut app) = fixture();
        select_named(&mut app, "data.bin");
        let effect = app.handle_key(key('l'));
        assert!(matches!(effect, Effect::Open(p) if p.ends_with("data.bin")));
        assert!(app.modal().is_idle());
    }

    #[test]
    fn test_status_swallows_next_key() {
        let (_temp, mut app) = fixture();
        app.set_status("No duplicates found.");
        assert_eq!(app.handle_key(key('q')), Effect::None);
        assert!(app.status().is_none());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_goto_menu_lists_bookmarks_and_back() {
        let (temp, app) = fixture();
        let target = temp.path().join("photos");
        let mut app = app.with_bookmarks(vec![Bookmark {
            key: '1',
            label: "Photos".to_string(),
            path: target.clone(),
        }]);

        app.handle_key(key('g'));
        let Modal::MenuOpen(menu) = app.modal() else {
            panic!("expected go-to menu");
        };
        let labels: Vec<String> = menu.options().iter().map(|o| o.display()).collect();
        assert_eq!(labels, vec!["[1] Photos", "[c] Cancel"]);

        let start = app.nav().current_path().to_path_buf();
        app.handle_key(key('1'));
        app.refresh();
        assert_eq!(app.nav().history().last(), Some(&start));

        app.handle_key(key('g'));
        let Modal::MenuOpen(menu) = app.modal() else {
            panic!("expected go-to menu");
        };
        assert!(menu.options().iter().any(|o| o.display() == "[b] Go Back"));
        app.handle_key(key('b'));
        app.refresh();
        assert_eq!(app.nav().current_path(), start);
    }

    #[test]
    fn test_finish_scan_empty_sets_status() {
        let (temp, mut app) = fixture();
        let outcome = ScanOutcome {
            groups: Vec::new(),
            from_cache: false,
        };
        app.finish_scan(temp.path(), Ok(outcome));
        assert_eq!(app.status(), Some("No duplicates found."));
        assert_eq!(app.mode(), AppMode::Browsing);
    }

    #[test]
    fn test_finish_scan_error_sets_status() {
        let (temp, mut app) = fixture();
        let err = ScanError::BackendUnavailable {
            backend: "video",
            reason: "vid_dup_finder not found".to_string(),
        };
        app.finish_scan(temp.path(), Err(err));
        assert!(app.status().unwrap().starts_with("Scan failed"));
        assert!(app.review().is_none());
    }

    #[test]
    fn test_review_menu_and_confirm() {
        let temp = TempDir::new().unwrap();
        let mut app = review_app(&temp);
        assert_eq!(app.mode(), AppMode::Reviewing);

        app.handle_key(key('j'));
        app.handle_key(code(KeyCode::Enter));
        let Modal::MenuOpen(menu) = app.modal() else {
            panic!("expected action menu");
        };
        let labels: Vec<String> = menu.options().iter().map(|o| o.display()).collect();
        assert_eq!(labels, vec!["[v] View", "[d] Delete", "[c] Cancel"]);

        assert_eq!(app.handle_key(key('d')), Effect::None);
        let Modal::Confirming(confirm) = app.modal() else {
            panic!("expected confirmation");
        };
        assert_eq!(confirm.message, "Delete: b.jpg?");

        let Effect::Delete(target) = app.handle_key(key('y')) else {
            panic!("expected delete effect");
        };
        assert!(target.path.ends_with("b.jpg"));
        assert!(!target.tombstoned);
    }

    #[test]
    fn test_review_confirm_declined() {
        let temp = TempDir::new().unwrap();
        let mut app = review_app(&temp);
        app.handle_key(code(KeyCode::Enter));
        app.handle_key(key('d'));
        assert_eq!(app.handle_key(key('n')), Effect::None);
        assert!(app.modal().is_idle());
        assert!(temp.path().join("a.jpg").exists());
    }

    #[test]
    fn test_tombstone_delete_skips_confirmation() {
        let temp = TempDir::new().unwrap();
        let mut app = review_app(&temp);
        let path = temp.path().join("a.jpg");
        let line = app.review().unwrap().selected_line_index().unwrap();
        app.review_mut().unwrap().mark_deleted(line, &path);

        app.handle_key(code(KeyCode::Enter));
        let effect = app.handle_key(key('d'));
        assert!(matches!(effect, Effect::Delete(t) if t.tombstoned));
        assert!(app.modal().is_idle());
    }

    #[test]
    fn test_leave_review_with_h() {
        let temp = TempDir::new().unwrap();
        let mut app = review_app(&temp);
        app.handle_key(key('h'));
        assert_eq!(app.mode(), AppMode::Browsing);
        assert!(app.review().is_none());
        assert!(app.nav().needs_refresh());
    }

    #[test]
    fn test_ctrl_c_exits_from_review_menu() {
        let temp = TempDir::new().unwrap();
        let mut app = review_app(&temp);
        app.handle_key(code(KeyCode::Enter));
        assert!(!app.modal().is_idle());

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), Effect::None);
        assert!(app.should_quit());
        assert!(app.modal().is_idle());
    }

    #[test]
    fn test_ctrl_c_exits_past_status() {
        let (_temp, mut app) = fixture();
        app.set_status("No duplicates found.");
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_quit_in_review_returns_to_browser() {
        let temp = TempDir::new().unwrap();
        let mut app = review_app(&temp);
        app.handle_key(code(KeyCode::Esc));
        assert_eq!(app.mode(), AppMode::Browsing);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_review_selection_wraps() {
        let temp = TempDir::new().unwrap();
        let mut app = review_app(&temp);
        let first = app.review().unwrap().selected_line_index();
        app.handle_key(key('k'));
        let last = app.review().unwrap().selected_line_index();
        assert_ne!(first, last);
        app.handle_key(key('j'));
        assert_eq!(app.review().unwrap().selected_line_index(), first);
    }
}
