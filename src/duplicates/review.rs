//! Review state for a scanned directory's duplicate groups.
//!
//! # Overview
//!
//! Groups are flattened into display lines: a header per group, one line
//! per member, then a blank separator. Only member lines are selectable.
//! The selectable index list is computed once when the review is built;
//! deleting a member turns its line into a tombstone that stays visible
//! and selectable but can no longer be acted on.
//!
//! # Divergence Highlighting
//!
//! Duplicates usually share a long directory prefix. For member lines under
//! the review's base directory, [`highlight_split`] reports where the
//! shared prefix ends so the renderer can draw the diverging suffix in a
//! contrasting style.
//!
//! # Example
//!
//! ```
//! use dupbrowse::duplicates::{build_review, Direction, DuplicateGroup, ReviewLine};
//! use std::path::{Path, PathBuf};
//!
//! let group = DuplicateGroup::new(
//!     "3f2a",
//!     vec![PathBuf::from("/media/a.jpg"), PathBuf::from("/media/b.jpg")],
//! )
//! .unwrap();
//! let mut review = build_review(vec![group], Path::new("/media"));
//!
//! assert_eq!(review.lines().len(), 4); // header, 2 members, separator
//! review.move_selection(Direction::Down);
//! assert_eq!(review.selected_line_index(), Some(2));
//! ```

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use super::groups::DuplicateGroup;
use crate::viewport::{follow_selection, wrap_step};

/// Marker drawn in front of the highlighted line.
pub const SELECTED_MARKER: &str = "> ";

/// Marker drawn in front of every other line.
pub const IDLE_MARKER: &str = "  ";

/// Width of the line marker in columns.
pub const MARKER_WIDTH: usize = 2;

/// Selection movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the first line
    Up,
    /// Towards the last line
    Down,
}

/// One display line of the review screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewLine {
    /// Group header
    Header { group_id: String },
    /// A group member; `tombstoned` once deleted in this session
    Member {
        group: usize,
        path: PathBuf,
        tombstoned: bool,
    },
    /// Blank line after each group
    Separator,
}

impl ReviewLine {
    /// Text of the line without the selection marker.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Header { group_id } => format!("--- SET: {group_id} ---"),
            Self::Member {
                path,
                tombstoned: false,
                ..
            } => path.to_string_lossy().into_owned(),
            Self::Member {
                path,
                tombstoned: true,
                ..
            } => format!("--- DELETED: {} ---", path.display()),
            Self::Separator => String::new(),
        }
    }

    /// Whether the line can hold the selection.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Member { .. })
    }
}

/// The highlighted member line, resolved for action dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    /// Index into [`ReviewState::lines`]
    pub line_index: usize,
    /// Member path (original path for tombstones)
    pub path: PathBuf,
    /// Whether the member was already deleted
    pub tombstoned: bool,
}

/// Review session state.
#[derive(Debug, Clone)]
pub struct ReviewState {
    groups: Vec<DuplicateGroup>,
    lines: Vec<ReviewLine>,
    selectable_indices: Vec<usize>,
    selection_cursor: usize,
    scroll_offset: usize,
    base_directory: PathBuf,
    base_prefix: String,
    viewport_height: usize,
}

/// Flatten `groups` into a review session rooted at `base_directory`.
///
/// Groups are kept even when deletions leave them with a single live
/// member, so line indices never shift during a session.
#[must_use]
pub fn build_review(groups: Vec<DuplicateGroup>, base_directory: &Path) -> ReviewState {
    let mut lines = Vec::new();
    for (index, group) in groups.iter().enumerate() {
        lines.push(ReviewLine::Header {
            group_id: group.id.clone(),
        });
        for member in group.members() {
            lines.push(ReviewLine::Member {
                group: index,
                path: member.path().to_path_buf(),
                tombstoned: member.is_tombstone(),
            });
        }
        lines.push(ReviewLine::Separator);
    }

    let selectable_indices = selectable_indices(&lines);
    log::debug!(
        "Built review for {}: {} groups, {} lines, {} selectable",
        base_directory.display(),
        groups.len(),
        lines.len(),
        selectable_indices.len()
    );

    ReviewState {
        groups,
        lines,
        selectable_indices,
        selection_cursor: 0,
        scroll_offset: 0,
        base_prefix: base_prefix(base_directory),
        base_directory: base_directory.to_path_buf(),
        viewport_height: 20,
    }
}

fn selectable_indices(lines: &[ReviewLine]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.is_selectable())
        .map(|(i, _)| i)
        .collect()
}

/// Base directory rendered with exactly one trailing separator.
#[must_use]
pub fn base_prefix(base_directory: &Path) -> String {
    let text = base_directory.to_string_lossy();
    let trimmed = text.trim_end_matches(MAIN_SEPARATOR);
    format!("{trimmed}{MAIN_SEPARATOR}")
}

/// Column at which a rendered line switches to the divergence style.
///
/// Returns `Some(MARKER_WIDTH + base_prefix.len())` for a live member line
/// whose path starts with `base_prefix`, and `None` for headers,
/// separators, tombstones and paths outside the base directory. The value
/// is a byte offset into `marker + line.text()`.
#[must_use]
pub fn highlight_split(line: &ReviewLine, base_prefix: &str) -> Option<usize> {
    match line {
        ReviewLine::Member {
            path,
            tombstoned: false,
            ..
        } if path.to_string_lossy().starts_with(base_prefix) => {
            Some(MARKER_WIDTH + base_prefix.len())
        }
        _ => None,
    }
}

impl ReviewState {
    // ==================== Accessors ====================

    /// All display lines.
    #[must_use]
    pub fn lines(&self) -> &[ReviewLine] {
        &self.lines
    }

    /// Indices of member lines, in display order.
    #[must_use]
    pub fn selectable_indices(&self) -> &[usize] {
        &self.selectable_indices
    }

    /// Position of the selection within [`Self::selectable_indices`].
    #[must_use]
    pub fn selection_cursor(&self) -> usize {
        self.selection_cursor
    }

    /// First visible line index.
    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Directory the scan was run on.
    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Base directory with a trailing separator, as used for highlighting.
    #[must_use]
    pub fn base_prefix(&self) -> &str {
        &self.base_prefix
    }

    /// Groups under review, tombstones included.
    #[must_use]
    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    /// Whether there is nothing to review.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectable_indices.is_empty()
    }

    /// Number of members deleted in this session.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, ReviewLine::Member { tombstoned: true, .. }))
            .count()
    }

    /// Line index of the selection.
    #[must_use]
    pub fn selected_line_index(&self) -> Option<usize> {
        self.selectable_indices.get(self.selection_cursor).copied()
    }

    /// The selected line.
    #[must_use]
    pub fn selected_line(&self) -> Option<&ReviewLine> {
        self.selected_line_index().and_then(|i| self.lines.get(i))
    }

    /// The selected member resolved for action dispatch.
    #[must_use]
    pub fn selected_target(&self) -> Option<ReviewTarget> {
        let line_index = self.selected_line_index()?;
        match self.lines.get(line_index)? {
            ReviewLine::Member {
                path, tombstoned, ..
            } => Some(ReviewTarget {
                line_index,
                path: path.clone(),
                tombstoned: *tombstoned,
            }),
            _ => None,
        }
    }

    /// Divergence split for a line of this review.
    #[must_use]
    pub fn split_for(&self, line: &ReviewLine) -> Option<usize> {
        highlight_split(line, &self.base_prefix)
    }

    // ==================== Navigation ====================

    /// Set the number of visible rows and re-clamp the scroll offset.
    pub fn set_viewport_height(&mut self, rows: usize) {
        self.viewport_height = rows.max(1);
        self.update_scroll();
    }

    /// Move the selection to the neighbouring member line, wrapping at both ends.
    pub fn move_selection(&mut self, direction: Direction) {
        self.selection_cursor = wrap_step(
            self.selection_cursor,
            self.selectable_indices.len(),
            direction == Direction::Down,
        );
        self.update_scroll();
    }

    fn update_scroll(&mut self) {
        if let Some(line) = self.selected_line_index() {
            self.scroll_offset = follow_selection(line, self.scroll_offset, self.viewport_height);
        }
    }

    // ==================== Deletion ====================

    /// Replace the member at `line_index` with a tombstone for `original_path`.
    ///
    /// Selectable indices are left untouched. Returns false when the line is
    /// not a live member with that path.
    pub fn mark_deleted(&mut self, line_index: usize, original_path: &Path) -> bool {
        let Some(ReviewLine::Member {
            group,
            path,
            tombstoned,
        }) = self.lines.get_mut(line_index)
        else {
            return false;
        };
        if *tombstoned || path != original_path {
            return false;
        }
        *tombstoned = true;
        let group = *group;
        if let Some(g) = self.groups.get_mut(group) {
            g.mark_deleted(original_path);
        }
        log::debug!("Tombstoned line {}: {}", line_index, original_path.display());
        true
    }
}
