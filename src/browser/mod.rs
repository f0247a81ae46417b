//! File browser module.
//!
//! This module provides:
//! - Single-level directory listing with a synthetic `..` entry
//! - Navigation state (selection, scrolling, hidden toggle, history)
//!
//! # Listing Order
//!
//! Entries are listed as `..` (omitted at the filesystem root), then
//! directories, then files. Directories and files are each sorted
//! case-insensitively. A directory that cannot be read is shown as a
//! single placeholder entry that leads back to the parent.

pub mod listing;
pub mod navigation;

pub use listing::{
    list_directory, list_or_placeholder, DirectoryEntry, EntryKind, ListError, PARENT_LABEL,
    UNREADABLE_LABEL,
};
pub use navigation::{EnterOutcome, NavigationState};
