//! Duplicate group model and review session.
//!
//! This module provides:
//! - [`DuplicateGroup`], a set of files a backend believes identical
//! - [`ReviewState`], the flattened, selectable view of a scan result
//!
//! Deletions during review never remove lines; the deleted member is
//! replaced with a tombstone so indices stay stable.

pub mod groups;
pub mod review;

pub use groups::{DuplicateGroup, GroupMember};
pub use review::{
    base_prefix, build_review, highlight_split, Direction, ReviewLine, ReviewState, ReviewTarget,
    IDLE_MARKER, MARKER_WIDTH, SELECTED_MARKER,
};
