//! File actions module.
//!
//! This module provides functionality for:
//! - Modal menus and yes/no prompts that own input while open
//! - Permanent deletion, or moving to the system trash
//! - Opening files with external viewers, players and editors
//!
//! # Deletion
//!
//! ```no_run
//! use dupbrowse::actions::delete::{delete_file, DeleteMode};
//! use std::path::Path;
//!
//! let result = delete_file(Path::new("/path/to/duplicate.jpg"), DeleteMode::Trash);
//! ```
//!
//! # Opening
//!
//! Opening is split into planning ([`open::plan_open`]) and launching, so
//! the event loop can suspend the screen for programs that take over the
//! terminal.

pub mod delete;
pub mod menu;
pub mod open;

pub use delete::{
    delete_file, delete_to_trash, permanent_delete, DeleteError, DeleteMode, DeleteResult,
};
pub use menu::{confirm_answer, Choice, Confirm, Menu, MenuOption, Modal, ModalKey, ModalOutcome};
pub use open::{
    launch_detached, plan_open, run_foreground, LaunchSpec, Launchers, MediaKind, OpenError,
    OpenPlan,
};
