//! Terminal User Interface module.
//!
//! The interactive file browser and duplicate review screens, built on
//! ratatui with the crossterm backend.
//!
//! # Overview
//!
//! - [`app`]: Application state (modes, browser, review session, menus)
//! - [`events`]: Blocking terminal input
//! - [`keybindings`]: Key-to-action mapping
//! - [`theme`]: Color palettes
//! - [`ui`]: Ratatui rendering
//! - [`run`]: Terminal ownership and the event loop
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. A key is read from the terminal (crossterm)
//! 2. The key is translated to an Action, or fed to the open menu
//! 3. The App state changes and may request an Effect
//! 4. The loop performs the Effect and the UI renders the new state
//!
//! # Example
//!
//! ```no_run
//! use dupbrowse::tui::{App, Effect};
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//! use std::path::Path;
//!
//! let mut app = App::new(Path::new("/srv/media"));
//! app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
//! let scan_images = KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE);
//! if let Effect::Scan { directory, kind } = app.handle_key(scan_images) {
//!     println!("scan {} for {}", directory.display(), kind.name());
//! }
//! ```

pub mod app;
pub mod events;
pub mod keybindings;
pub mod run;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use app::{Action, App, AppMode, Effect, MenuAction};
pub use events::{Event, EventError, EventHandler};
pub use keybindings::KeyBindings;
pub use run::{perform_deletion, run_tui, RunContext, TerminalSession, TuiError, TuiResult};
pub use theme::Theme;
pub use ui::{list_height, render, truncate_front};
