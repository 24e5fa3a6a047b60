//! Key bindings for the combobox.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key binding that maps one or more key combinations to a described action.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The set of key combinations that trigger this binding.
    pub keys: Vec<KeyCombination>,
    /// A human-readable description of the action this binding performs.
    pub description: String,
    /// Whether this binding is currently active. Disabled bindings never match.
    pub enabled: bool,
}

/// A single key press with optional modifier keys (Ctrl, Alt, Shift).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Binding {
    /// Create a new binding for a single key combination with the given description.
    pub fn new(key: KeyCombination, description: impl Into<String>) -> Self {
        Self::with_keys(vec![key], description)
    }

    /// Create a new binding for multiple key combinations with the given description.
    pub fn with_keys(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Return whether the given key event matches any of this binding's key
    /// combinations. Modifiers must match exactly, so `Down` and `Alt+Down`
    /// can be bound separately.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.enabled
            && self
                .keys
                .iter()
                .any(|k| k.code == event.code && event.modifiers == k.modifiers)
    }

    /// Set whether this binding is enabled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl KeyCombination {
    /// Create a key combination with no modifier keys.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Create a key combination with the Ctrl modifier.
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// Create a key combination with the Alt modifier.
    pub fn alt(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::ALT,
        }
    }
}

/// Configurable key bindings for [`Combobox`](crate::combobox::Combobox).
///
/// Override individual fields to customise keys:
///
/// ```ignore
/// use taro_widgets::key::{Binding, ComboboxKeyBindings, KeyCombination};
/// use crossterm::event::KeyCode;
///
/// let mut bindings = ComboboxKeyBindings::default();
/// bindings.next = Binding::new(KeyCombination::new(KeyCode::Tab), "Next");
/// ```
#[derive(Debug, Clone)]
pub struct ComboboxKeyBindings {
    /// Open the panel from the trigger. Default: Enter, Space, Down, Alt+Down
    pub open: Binding,
    /// Highlight the next row. Default: Down, Ctrl+N
    pub next: Binding,
    /// Highlight the previous row. Default: Up, Ctrl+P
    pub prev: Binding,
    /// Highlight the first row. Default: Home
    pub first: Binding,
    /// Highlight the last row. Default: End
    pub last: Binding,
    /// Commit the highlighted row. Default: Enter
    pub commit: Binding,
    /// Close without committing. Default: Esc
    pub dismiss: Binding,
    /// Clear the search text. Default: Ctrl+U
    pub clear_search: Binding,
}

impl Default for ComboboxKeyBindings {
    fn default() -> Self {
        Self {
            open: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Enter),
                    KeyCombination::new(KeyCode::Char(' ')),
                    KeyCombination::new(KeyCode::Down),
                    KeyCombination::alt(KeyCode::Down),
                ],
                "Open",
            ),
            next: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Down),
                    KeyCombination::ctrl(KeyCode::Char('n')),
                ],
                "Next",
            ),
            prev: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Up),
                    KeyCombination::ctrl(KeyCode::Char('p')),
                ],
                "Previous",
            ),
            first: Binding::new(KeyCombination::new(KeyCode::Home), "First"),
            last: Binding::new(KeyCombination::new(KeyCode::End), "Last"),
            commit: Binding::new(KeyCombination::new(KeyCode::Enter), "Select"),
            dismiss: Binding::new(KeyCombination::new(KeyCode::Esc), "Close"),
            clear_search: Binding::new(KeyCombination::ctrl(KeyCode::Char('u')), "Clear search"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn matches_exact_modifiers() {
        let b = Binding::new(KeyCombination::ctrl(KeyCode::Char('u')), "Clear");
        assert!(b.matches(&key(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert!(!b.matches(&key(KeyCode::Char('u'), KeyModifiers::NONE)));
        assert!(!b.matches(&key(
            KeyCode::Char('u'),
            KeyModifiers::CONTROL | KeyModifiers::ALT
        )));
    }

    #[test]
    fn disabled_never_matches() {
        let b = Binding::new(KeyCombination::new(KeyCode::Esc), "Close").enabled(false);
        assert!(!b.matches(&key(KeyCode::Esc, KeyModifiers::NONE)));
    }

    #[test]
    fn defaults_cover_navigation() {
        let b = ComboboxKeyBindings::default();
        assert!(b.next.matches(&key(KeyCode::Down, KeyModifiers::NONE)));
        assert!(b.prev.matches(&key(KeyCode::Char('p'), KeyModifiers::CONTROL)));
        assert!(b.open.matches(&key(KeyCode::Down, KeyModifiers::ALT)));
        assert!(b.commit.matches(&key(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(!b.commit.matches(&key(KeyCode::Char(' '), KeyModifiers::NONE)));
    }
}
