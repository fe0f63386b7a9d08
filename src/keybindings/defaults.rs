//! Built-in bindings, written in keybinds-rs key syntax.

use super::{Action, KeybindingMode, Keybindings};
use Action::*;

const NORMAL: &[(&str, Action)] = &[
    ("j", Next),
    ("Down", Next),
    ("k", Previous),
    ("Up", Previous),
    ("g", First),
    ("Home", First),
    ("G", Last),
    ("End", Last),
    ("d", PageDown),
    ("PageDown", PageDown),
    ("u", PageUp),
    ("PageUp", PageUp),
    ("Enter", OpenSelected),
    ("Tab", ToggleFocus),
    ("[", ToggleSidebar),
    ("b", GoHome),
    ("H", GoHome),
    ("Backspace", GoHome),
    ("r", Reload),
    ("t", BackToTop),
    ("o", OpenViewer),
    ("O", OpenDirect),
    ("y", CopyUrl),
    ("D", ToggleDarkMode),
    ("?", ToggleHelp),
    ("/", EnterSearchMode),
    ("s", EnterSearchMode),
    ("Ctrl+u", ClearSearch),
    ("q", Quit),
    ("Escape", Quit),
    ("Ctrl+c", Quit),
];

// Printable characters are not bound here; the app treats them as filter input
const SEARCH: &[(&str, Action)] = &[
    ("Escape", ExitMode),
    ("Enter", ConfirmSearch),
    ("Backspace", SearchBackspace),
    ("Ctrl+u", ClearSearch),
    ("Down", Next),
    ("Up", Previous),
    ("Ctrl+c", Quit),
];

const HELP: &[(&str, Action)] = &[
    ("j", HelpScrollDown),
    ("Down", HelpScrollDown),
    ("k", HelpScrollUp),
    ("Up", HelpScrollUp),
    ("d", PageDown),
    ("PageDown", PageDown),
    ("u", PageUp),
    ("PageUp", PageUp),
    ("?", ToggleHelp),
    ("Escape", ToggleHelp),
    ("q", Quit),
];

pub fn default_keybindings() -> Keybindings {
    let mut kb = Keybindings::empty();
    for (mode, table) in [
        (KeybindingMode::Normal, NORMAL),
        (KeybindingMode::Search, SEARCH),
        (KeybindingMode::Help, HELP),
    ] {
        for &(key, action) in table {
            if let Err(error) = kb.bind(mode, key, action) {
                tracing::error!(
                    mode = mode.label(),
                    key,
                    %error,
                    "built-in keybinding does not parse"
                );
            }
        }
    }
    kb
}
