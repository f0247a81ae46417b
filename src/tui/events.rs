//! TUI event handling with crossterm.
//!
//! # Overview
//!
//! The event loop is blocking: nothing changes on screen unless a key
//! arrives or the terminal is resized. [`EventHandler::next`] waits for the
//! next relevant event and drops everything else (key releases, mouse
//! input, focus changes, paste).

use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind};
use thiserror::Error;

/// Error reading terminal events.
#[derive(Debug, Error)]
pub enum EventError {
    /// The terminal input stream failed.
    #[error("failed to read terminal event: {0}")]
    Read(#[from] std::io::Error),
}

/// An input event the application reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key press
    Key(KeyEvent),
    /// The terminal was resized to (columns, rows)
    Resize(u16, u16),
}

impl Event {
    /// Filter a raw crossterm event.
    #[must_use]
    pub fn from_crossterm(raw: event::Event) -> Option<Self> {
        match raw {
            event::Event::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            event::Event::Resize(cols, rows) => Some(Self::Resize(cols, rows)),
            _ => None,
        }
    }
}

/// Reads events from the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventHandler;

impl EventHandler {
    /// Create a new handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Block until the next key press or resize.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    pub fn next(&self) -> Result<Event, EventError> {
        loop {
            if let Some(event) = Event::from_crossterm(event::read()?) {
                return Ok(event);
            }
        }
    }

    /// Wait up to `timeout`, returning early (and consuming the event) on input.
    ///
    /// # Errors
    ///
    /// Returns an error if polling or reading from the terminal fails.
    pub fn pause(&self, timeout: Duration) -> Result<(), EventError> {
        if event::poll(timeout)? {
            event::read()?;
        }
        Ok(())
    }

    /// Throw away any keys typed while the screen was suspended.
    ///
    /// # Errors
    ///
    /// Returns an error if polling or reading from the terminal fails.
    pub fn drain(&self) -> Result<(), EventError> {
        while event::poll(Duration::ZERO)? {
            event::read()?;
        }
        Ok(())
    }
}
