//! Navigation state for the file browser.
//!
//! # Overview
//!
//! [`NavigationState`] owns the current directory, its listed entries, the
//! selection and scroll offset, the show-hidden toggle and a history stack
//! of previously visited directories.
//!
//! Directory changes only flag a re-list; [`NavigationState::refresh`]
//! performs it. The event loop calls `refresh` once per keystroke, before
//! drawing.
//!
//! # Example
//!
//! ```no_run
//! use dupbrowse::browser::NavigationState;
//! use std::path::Path;
//!
//! let mut nav = NavigationState::new(Path::new("/tmp"));
//! nav.move_down();
//! nav.enter_selected();
//! nav.refresh();
//! let previous = nav.go_back();
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::listing::{is_root, list_or_placeholder, parent_or_self, DirectoryEntry, EntryKind};
use crate::viewport::{follow_selection, wrap_step};

/// Result of entering a browser entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterOutcome {
    /// The current directory changed (a re-list is pending).
    Changed,
    /// The entry is a file; the caller decides how to open it.
    File(PathBuf),
    /// Nothing happened (e.g. `..` at the filesystem root).
    Stayed,
}

/// Browser navigation state.
#[derive(Debug, Clone)]
pub struct NavigationState {
    current_path: PathBuf,
    entries: Vec<DirectoryEntry>,
    selection_index: usize,
    scroll_offset: usize,
    show_hidden: bool,
    history: Vec<PathBuf>,
    viewport_height: usize,
    needs_refresh: bool,
    last_error: Option<String>,
}

impl NavigationState {
    /// Create navigation state rooted at `start` and list it.
    #[must_use]
    pub fn new(start: &Path) -> Self {
        let mut state = Self {
            current_path: canonical(start),
            entries: Vec::new(),
            selection_index: 0,
            scroll_offset: 0,
            show_hidden: false,
            history: Vec::new(),
            viewport_height: 20,
            needs_refresh: true,
            last_error: None,
        };
        state.refresh();
        state
    }

    // ==================== Accessors ====================

    /// Current directory (absolute, canonicalized when possible).
    #[must_use]
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// Listed entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Index of the highlighted entry.
    #[must_use]
    pub fn selection_index(&self) -> usize {
        self.selection_index
    }

    /// First visible entry index.
    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Whether dotfiles are listed.
    #[must_use]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// Previously visited directories, oldest first.
    #[must_use]
    pub fn history(&self) -> &[PathBuf] {
        &self.history
    }

    /// Whether a re-list is pending.
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Error from the most recent listing, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The highlighted entry, if any.
    #[must_use]
    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.entries.get(self.selection_index)
    }

    /// Set the number of visible rows and re-clamp the scroll offset.
    pub fn set_viewport_height(&mut self, rows: usize) {
        self.viewport_height = rows.max(1);
        self.update_scroll();
    }

    // ==================== Listing ====================

    /// Flag the current directory for re-listing.
    pub fn mark_stale(&mut self) {
        self.needs_refresh = true;
    }

    /// Re-list the current directory if flagged.
    ///
    /// The selection index is kept where possible and clamped to the last
    /// entry when the listing shrank.
    pub fn refresh(&mut self) {
        if !self.needs_refresh {
            return;
        }
        let (entries, error) = list_or_placeholder(&self.current_path, self.show_hidden);
        self.entries = entries;
        self.last_error = error.map(|e| e.to_string());
        self.needs_refresh = false;
        self.clamp_selection();
        log::trace!(
            "Listed {} ({} entries)",
            self.current_path.display(),
            self.entries.len()
        );
    }

    // ==================== Selection ====================

    /// Move the selection up, wrapping from the first entry to the last.
    pub fn move_up(&mut self) {
        self.selection_index = wrap_step(self.selection_index, self.entries.len(), false);
        self.update_scroll();
    }

    /// Move the selection down, wrapping from the last entry to the first.
    pub fn move_down(&mut self) {
        self.selection_index = wrap_step(self.selection_index, self.entries.len(), true);
        self.update_scroll();
    }

    fn clamp_selection(&mut self) {
        if self.selection_index >= self.entries.len() {
            self.selection_index = self.entries.len().saturating_sub(1);
        }
        self.update_scroll();
    }

    fn update_scroll(&mut self) {
        self.scroll_offset =
            follow_selection(self.selection_index, self.scroll_offset, self.viewport_height);
    }

    // ==================== Directory Changes ====================

    /// Enter `entry`.
    ///
    /// Directories push the current path onto the history stack and become
    /// current. `..` (and the error placeholder) always move to the parent,
    /// independent of history. Files are returned to the caller untouched.
    pub fn enter(&mut self, entry: &DirectoryEntry) -> EnterOutcome {
        match entry.kind {
            EntryKind::Parent | EntryKind::Unreadable => {
                if self.go_up() {
                    EnterOutcome::Changed
                } else {
                    EnterOutcome::Stayed
                }
            }
            EntryKind::Directory => {
                self.push_and_change(entry.path.clone());
                EnterOutcome::Changed
            }
            EntryKind::File => EnterOutcome::File(entry.path.clone()),
        }
    }

    /// Enter the highlighted entry.
    pub fn enter_selected(&mut self) -> EnterOutcome {
        match self.selected_entry().cloned() {
            Some(entry) => self.enter(&entry),
            None => EnterOutcome::Stayed,
        }
    }

    /// Move to the parent directory. Returns false at the filesystem root.
    pub fn go_up(&mut self) -> bool {
        if is_root(&self.current_path) {
            return false;
        }
        let parent = parent_or_self(&self.current_path);
        self.push_and_change(parent);
        true
    }

    /// Jump to `target`, remembering the current directory in history.
    pub fn go_to(&mut self, target: &Path) {
        self.push_and_change(target.to_path_buf());
    }

    /// Pop the history stack and make the popped directory current.
    ///
    /// Returns `None` (and changes nothing) when the history is empty.
    pub fn go_back(&mut self) -> Option<PathBuf> {
        let previous = self.history.pop()?;
        self.change_to(previous.clone());
        Some(previous)
    }

    /// Flip the show-hidden toggle and re-list immediately.
    ///
    /// The selection follows the previously highlighted entry when it is
    /// still listed; otherwise it clamps to the last entry.
    pub fn toggle_hidden(&mut self) {
        let selected_path = self.selected_entry().map(|e| e.path.clone());
        self.show_hidden = !self.show_hidden;
        self.needs_refresh = true;
        self.refresh();

        if let Some(path) = selected_path {
            if let Some(index) = self.entries.iter().position(|e| e.path == path) {
                self.selection_index = index;
            }
        }
        self.clamp_selection();
        log::debug!("Show hidden: {}", self.show_hidden);
    }

    fn push_and_change(&mut self, target: PathBuf) {
        self.history.push(self.current_path.clone());
        self.change_to(target);
    }

    fn change_to(&mut self, target: PathBuf) {
        log::debug!(
            "Directory change: {} -> {}",
            self.current_path.display(),
            target.display()
        );
        self.current_path = canonical(&target);
        self.selection_index = 0;
        self.scroll_offset = 0;
        self.needs_refresh = true;
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
