//! Key dispatch for the dashboard, one keybinds-rs table per mode.
//!
//! Defaults live in [`defaults`]. Users override them per mode in the config file:
//!
//! ```toml
//! [keybindings.Normal]
//! "x" = "ToggleSidebar"
//! "Ctrl+d" = "ToggleDarkMode"
//!
//! [keybindings.Search]
//! "Ctrl+w" = "ClearSearch"
//! ```
//!
//! An override replaces whatever the same key sequence did before. Keys that fail to
//! parse are logged and skipped; the remaining overrides still apply.

mod action;
mod defaults;

pub use action::Action;

use crossterm::event::KeyEvent;
use keybinds::{Keybind, Keybinds, KeySeq};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input modes, each with its own table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum KeybindingMode {
    /// Sidebar and content navigation
    Normal,
    /// Typing into the sidebar filter
    Search,
    /// Help popup is shown
    Help,
}

impl KeybindingMode {
    pub fn label(self) -> &'static str {
        match self {
            KeybindingMode::Normal => "Normal",
            KeybindingMode::Search => "Search",
            KeybindingMode::Help => "Help",
        }
    }
}

#[derive(Debug)]
pub struct Keybindings {
    modes: HashMap<KeybindingMode, Keybinds<Action>>,
}

impl Default for Keybindings {
    fn default() -> Self {
        defaults::default_keybindings()
    }
}

impl Keybindings {
    fn empty() -> Self {
        Self {
            modes: HashMap::new(),
        }
    }

    /// Built-in bindings with `overrides` applied on top.
    pub fn with_overrides(overrides: &KeybindingsConfig) -> Self {
        let mut keybindings = Self::default();
        keybindings.apply_overrides(overrides);
        keybindings
    }

    /// Feed one key press to the table for `mode`.
    ///
    /// Returns `None` for unbound keys and for the first keys of a multi-key sequence.
    pub fn dispatch(&mut self, mode: KeybindingMode, event: KeyEvent) -> Option<Action> {
        self.modes
            .get_mut(&mode)
            .and_then(|keybinds| keybinds.dispatch(event).copied())
    }

    /// Drop half-typed sequences in every mode.
    pub fn cancel_pending(&mut self) {
        self.modes.values_mut().for_each(Keybinds::reset);
    }

    /// Bind `key_sequence` in `mode`, replacing an earlier binding of the same sequence.
    pub fn bind(
        &mut self,
        mode: KeybindingMode,
        key_sequence: &str,
        action: Action,
    ) -> Result<(), keybinds::Error> {
        let seq: KeySeq = key_sequence.parse()?;
        let keybinds = self.modes.entry(mode).or_default();

        // Dispatch takes the first match, so a shadowed entry has to go
        let mut binds = std::mem::take(keybinds).into_vec();
        binds.retain(|bind| bind.seq != seq);
        binds.push(Keybind::new(seq, action));
        *keybinds = Keybinds::new(binds);
        Ok(())
    }

    /// Apply every valid override; returns the keys that were rejected.
    pub fn apply_overrides(&mut self, overrides: &KeybindingsConfig) -> Vec<String> {
        let mut rejected = Vec::new();
        for (mode, bindings) in &overrides.0 {
            for (key, action) in bindings {
                if let Err(error) = self.bind(*mode, key, *action) {
                    tracing::warn!(
                        mode = mode.label(),
                        key = %key,
                        %error,
                        "ignoring invalid keybinding"
                    );
                    rejected.push(key.clone());
                }
            }
        }
        rejected
    }

    /// Actions bound in `mode` with their keys, ordered by category then description.
    pub fn help_entries(&self, mode: KeybindingMode) -> Vec<(Action, Vec<String>)> {
        let mut by_action: HashMap<Action, Vec<String>> = HashMap::new();
        for bind in self.modes.get(&mode).map(Keybinds::as_slice).unwrap_or_default() {
            by_action
                .entry(bind.action)
                .or_default()
                .push(bind.seq.to_string());
        }

        let mut entries: Vec<_> = by_action.into_iter().collect();
        entries.sort_by_key(|(action, _)| (action.category(), action.description()));
        entries
    }
}

/// `[keybindings.<Mode>]` tables as read from the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeybindingsConfig(pub HashMap<KeybindingMode, HashMap<String, Action>>);

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(kb: &mut Keybindings, mode: KeybindingMode, c: char) -> Option<Action> {
        kb.dispatch(mode, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn overrides(toml_text: &str) -> KeybindingsConfig {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn test_unbound_key_dispatches_nothing() {
        let mut kb = Keybindings::empty();
        assert_eq!(press(&mut kb, KeybindingMode::Normal, 'j'), None);

        let mut kb = Keybindings::default();
        assert_eq!(press(&mut kb, KeybindingMode::Normal, 'j'), Some(Action::Next));
        assert_eq!(press(&mut kb, KeybindingMode::Normal, 'x'), None);
    }

    #[test]
    fn test_override_adds_binding_and_keeps_defaults() {
        let mut kb = Keybindings::with_overrides(&overrides(
            r#"
            [Normal]
            "x" = "ToggleSidebar"
            "#,
        ));
        assert_eq!(press(&mut kb, KeybindingMode::Normal, 'x'), Some(Action::ToggleSidebar));
        assert_eq!(press(&mut kb, KeybindingMode::Normal, 'q'), Some(Action::Quit));
    }

    #[test]
    fn test_override_replaces_default_key() {
        let mut kb = Keybindings::with_overrides(&overrides(
            r#"
            [Normal]
            "j" = "ToggleDarkMode"
            "#,
        ));
        assert_eq!(press(&mut kb, KeybindingMode::Normal, 'j'), Some(Action::ToggleDarkMode));

        let entries = kb.help_entries(KeybindingMode::Normal);
        let next_keys = &entries.iter().find(|(a, _)| *a == Action::Next).unwrap().1;
        assert_eq!(next_keys, &vec!["Down".to_string()]);
    }

    #[test]
    fn test_invalid_override_keeps_valid_ones() {
        // Each parse seeds a new hash order, so repeat to catch order-dependent loss
        for _ in 0..20 {
            let config = overrides(
                r#"
                [Normal]
                "x" = "ToggleSidebar"
                "z" = "ToggleDarkMode"
                "Ctrl+Bogus" = "Quit"
                "v" = "Reload"

                [Help]
                "x" = "ToggleHelp"
                "#,
            );
            let mut kb = Keybindings::default();
            assert_eq!(kb.apply_overrides(&config), vec!["Ctrl+Bogus".to_string()]);

            assert_eq!(press(&mut kb, KeybindingMode::Normal, 'x'), Some(Action::ToggleSidebar));
            assert_eq!(press(&mut kb, KeybindingMode::Normal, 'z'), Some(Action::ToggleDarkMode));
            assert_eq!(press(&mut kb, KeybindingMode::Normal, 'v'), Some(Action::Reload));
            assert_eq!(press(&mut kb, KeybindingMode::Help, 'x'), Some(Action::ToggleHelp));
        }
    }

    #[test]
    fn test_cancel_pending_drops_partial_sequence() {
        let mut kb = Keybindings::default();
        kb.bind(KeybindingMode::Normal, "z z", Action::Quit).unwrap();

        assert_eq!(press(&mut kb, KeybindingMode::Normal, 'z'), None);
        assert_eq!(press(&mut kb, KeybindingMode::Normal, 'z'), Some(Action::Quit));

        assert_eq!(press(&mut kb, KeybindingMode::Normal, 'z'), None);
        kb.cancel_pending();
        assert_eq!(press(&mut kb, KeybindingMode::Normal, 'z'), None);
    }

    #[test]
    fn test_help_entries_sorted_and_labelled() {
        let kb = Keybindings::default();
        let entries = kb.help_entries(KeybindingMode::Normal);

        let categories: Vec<_> = entries.iter().map(|(a, _)| a.category()).collect();
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);

        let quit_keys = &entries.iter().find(|(a, _)| *a == Action::Quit).unwrap().1;
        assert!(quit_keys.contains(&"Ctrl+c".to_string()));
        assert!(quit_keys.contains(&"Esc".to_string()));
    }
}
