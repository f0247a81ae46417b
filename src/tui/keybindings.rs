//! Keybinding configuration for the TUI.
//!
//! Vim-style keys (hjkl) and arrow keys are both bound. The same action set
//! serves the browser and the review screen; [`App`](super::app::App)
//! interprets each action according to the current mode.
//!
//! While a menu or prompt is open, keys bypass these bindings and are
//! translated with [`modal_key`] instead.
//!
//! # Example
//!
//! ```
//! use dupbrowse::tui::keybindings::KeyBindings;
//! use dupbrowse::tui::Action;
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//!
//! let bindings = KeyBindings::default();
//!
//! let j_key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
//! let down_key = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
//!
//! assert_eq!(bindings.resolve(&j_key), Some(Action::NavigateDown));
//! assert_eq!(bindings.resolve(&down_key), Some(Action::NavigateDown));
//! ```

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::Action;
use crate::actions::menu::ModalKey;

/// Key-to-action mapping.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    action_keys: HashMap<Action, Vec<KeyEvent>>,
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ch(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut action_keys = HashMap::new();
        action_keys.insert(Action::NavigateUp, vec![ch('k'), key(KeyCode::Up)]);
        action_keys.insert(Action::NavigateDown, vec![ch('j'), key(KeyCode::Down)]);
        action_keys.insert(Action::Enter, vec![ch('l'), key(KeyCode::Right)]);
        action_keys.insert(Action::Activate, vec![key(KeyCode::Enter)]);
        action_keys.insert(Action::Parent, vec![ch('h'), key(KeyCode::Left)]);
        action_keys.insert(Action::ToggleHidden, vec![ch('4'), ch('.')]);
        action_keys.insert(Action::GoTo, vec![ch('g')]);
        action_keys.insert(Action::GoBack, vec![ch('b'), key(KeyCode::Backspace)]);
        action_keys.insert(Action::Quit, vec![ch('q'), key(KeyCode::Esc)]);
        action_keys.insert(
            Action::Interrupt,
            vec![KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)],
        );
        Self { action_keys }
    }
}

impl KeyBindings {
    /// Resolve a key event to an action.
    ///
    /// Shift is ignored for character keys, so `Q` behaves like `q`.
    #[must_use]
    pub fn resolve(&self, event: &KeyEvent) -> Option<Action> {
        let normalized = normalize(event);
        self.action_keys
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| *k == normalized))
            .map(|(action, _)| *action)
    }

    /// Keys bound to `action`.
    #[must_use]
    pub fn keys_for(&self, action: Action) -> &[KeyEvent] {
        self.action_keys.get(&action).map_or(&[], Vec::as_slice)
    }

    /// Short display form of the first key bound to `action`.
    #[must_use]
    pub fn hint(&self, action: Action) -> String {
        self.keys_for(action)
            .first()
            .map_or_else(String::new, format_key)
    }
}

fn normalize(event: &KeyEvent) -> KeyEvent {
    match event.code {
        KeyCode::Char(c) => KeyEvent::new(
            KeyCode::Char(c.to_ascii_lowercase()),
            event.modifiers - KeyModifiers::SHIFT,
        ),
        code => KeyEvent::new(code, event.modifiers),
    }
}

/// Display a key the way footers show it.
#[must_use]
pub fn format_key(event: &KeyEvent) -> String {
    match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        other => format!("{other:?}"),
    }
}

/// Translate a key event for an open menu or prompt.
#[must_use]
pub fn modal_key(event: &KeyEvent) -> ModalKey {
    match event.code {
        KeyCode::Enter => ModalKey::Enter,
        KeyCode::Esc => ModalKey::Escape,
        KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => ModalKey::Char(c),
        _ => ModalKey::Other,
    }
}
