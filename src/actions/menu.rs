//! Modal menus and confirmation prompts.
//!
//! # Overview
//!
//! While a menu or prompt is open it owns all input: every key goes to the
//! [`Modal`] until it resolves. The flow is
//! `Idle -> MenuOpen -> Idle` for ordinary choices and
//! `Idle -> MenuOpen -> Confirming -> Idle` for destructive ones; the
//! caller decides which choices need confirmation by calling
//! [`Modal::confirm`] after a menu resolves.
//!
//! Menu keys: an option's mnemonic (case-insensitive), Enter for the first
//! option, Esc or `q` for cancel. Prompt keys: `y`/`Y` proceeds, `n`/`N`/Esc
//! cancels, anything else is ignored.
//!
//! # Example
//!
//! ```
//! use dupbrowse::actions::menu::{Menu, Modal, ModalKey, ModalOutcome};
//!
//! let mut modal = Modal::Idle;
//! modal.open_menu(Menu::new("Action:").option('v', "View", "view").with_cancel());
//!
//! assert_eq!(modal.handle(ModalKey::Char('x')), ModalOutcome::Pending);
//! assert_eq!(modal.handle(ModalKey::Char('V')), ModalOutcome::Chosen("view"));
//! assert!(modal.is_idle());
//! ```

/// Key input relevant to menus and prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// A printable character
    Char(char),
    /// Anything else
    Other,
}

/// What selecting an option does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<A> {
    /// Run the action
    Action(A),
    /// Close the menu without doing anything
    Cancel,
}

/// One line of a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption<A> {
    /// Mnemonic key
    pub key: char,
    /// Text shown after the key
    pub label: String,
    /// Result of picking this option
    pub choice: Choice<A>,
}

impl<A> MenuOption<A> {
    /// Display text, e.g. `[d] Delete`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("[{}] {}", self.key, self.label)
    }
}

/// A titled list of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu<A> {
    /// Title line
    pub title: String,
    options: Vec<MenuOption<A>>,
}

impl<A> Menu<A> {
    /// Create an empty menu.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            options: Vec::new(),
        }
    }

    /// Add an action option.
    #[must_use]
    pub fn option(mut self, key: char, label: impl Into<String>, action: A) -> Self {
        self.options.push(MenuOption {
            key,
            label: label.into(),
            choice: Choice::Action(action),
        });
        self
    }

    /// Add the `[c] Cancel` option.
    #[must_use]
    pub fn with_cancel(mut self) -> Self {
        self.options.push(MenuOption {
            key: 'c',
            label: "Cancel".to_string(),
            choice: Choice::Cancel,
        });
        self
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[MenuOption<A>] {
        &self.options
    }

    /// Index of the option selected by `key`, or `None` if the key is ignored.
    ///
    /// Returns `Some(None)` for a cancel key that matches no option.
    #[must_use]
    pub fn resolve(&self, key: ModalKey) -> Option<Option<usize>> {
        match key {
            ModalKey::Enter if !self.options.is_empty() => Some(Some(0)),
            ModalKey::Enter => Some(None),
            ModalKey::Char(c) => {
                let lower = c.to_ascii_lowercase();
                if let Some(index) = self
                    .options
                    .iter()
                    .position(|o| o.key.to_ascii_lowercase() == lower)
                {
                    Some(Some(index))
                } else if lower == 'q' {
                    Some(None)
                } else {
                    None
                }
            }
            ModalKey::Escape => Some(None),
            ModalKey::Other => None,
        }
    }
}

/// A pending yes/no prompt guarding an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirm<A> {
    /// Question shown to the user
    pub message: String,
    /// Action run on `y`
    pub action: A,
}

/// Map a prompt key to an answer; `None` for keys the prompt ignores.
#[must_use]
pub fn confirm_answer(key: ModalKey) -> Option<bool> {
    match key {
        ModalKey::Char('y' | 'Y') => Some(true),
        ModalKey::Char('n' | 'N') | ModalKey::Escape => Some(false),
        _ => None,
    }
}

/// Result of feeding one key to a [`Modal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome<A> {
    /// Nothing open, or the key was ignored
    Pending,
    /// Closed without an action
    Cancelled,
    /// A menu option was picked
    Chosen(A),
    /// A prompt was answered yes
    Confirmed(A),
}

/// Modal input state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal<A> {
    /// No menu or prompt
    Idle,
    /// A menu owns input
    MenuOpen(Menu<A>),
    /// A yes/no prompt owns input
    Confirming(Confirm<A>),
}

impl<A> Default for Modal<A> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<A: Clone> Modal<A> {
    /// Whether keys should go to normal navigation.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Open `menu`, replacing whatever was open.
    pub fn open_menu(&mut self, menu: Menu<A>) {
        log::debug!("Modal: open menu {:?}", menu.title);
        *self = Self::MenuOpen(menu);
    }

    /// Ask for confirmation before `action`.
    pub fn confirm(&mut self, message: impl Into<String>, action: A) {
        let message = message.into();
        log::debug!("Modal: confirming {:?}", message);
        *self = Self::Confirming(Confirm { message, action });
    }

    /// Close without an action.
    pub fn close(&mut self) {
        *self = Self::Idle;
    }

    /// Feed one key.
    pub fn handle(&mut self, key: ModalKey) -> ModalOutcome<A> {
        let outcome = match self {
            Self::Idle => return ModalOutcome::Pending,
            Self::MenuOpen(menu) => match menu.resolve(key) {
                None => return ModalOutcome::Pending,
                Some(None) => ModalOutcome::Cancelled,
                Some(Some(index)) => match &menu.options()[index].choice {
                    Choice::Action(action) => ModalOutcome::Chosen(action.clone()),
                    Choice::Cancel => ModalOutcome::Cancelled,
                },
            },
            Self::Confirming(confirm) => match confirm_answer(key) {
                None => return ModalOutcome::Pending,
                Some(true) => ModalOutcome::Confirmed(confirm.action.clone()),
                Some(false) => ModalOutcome::Cancelled,
            },
        };
        log::debug!(
            "Modal: {} -> idle",
            if matches!(outcome, ModalOutcome::Cancelled) {
                "cancelled"
            } else {
                "resolved"
            }
        );
        *self = Self::Idle;
        outcome
    }
}
