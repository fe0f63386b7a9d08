//! Action definitions for keybindings
//!
//! This module defines all bindable actions in studydash.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// All bindable actions in studydash
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum Action {
    // === Navigation ===
    /// Move to next item (sidebar entry, welcome card, or content line)
    Next,
    /// Move to previous item
    Previous,
    /// Jump to first item
    First,
    /// Jump to last item
    Last,
    /// Scroll down by page
    PageDown,
    /// Scroll up by page
    PageUp,

    // === Sidebar ===
    /// Open the selected document
    OpenSelected,
    /// Toggle focus between sidebar and content
    ToggleFocus,
    /// Collapse or expand the sidebar
    ToggleSidebar,

    // === Document ===
    /// Return to the welcome view
    GoHome,
    /// Fetch the active document again
    Reload,
    /// Scroll the content pane back to the top
    BackToTop,
    /// Open the active document in the browser (PDF viewer or raw file)
    OpenViewer,
    /// Open the direct link to the active document
    OpenDirect,
    /// Copy the active document's URL
    CopyUrl,

    // === View ===
    /// Switch between dark and light theme
    ToggleDarkMode,
    /// Toggle help popup
    ToggleHelp,

    // === Search ===
    /// Enter search/filter mode
    EnterSearchMode,
    /// Keep the filter and leave search mode
    ConfirmSearch,
    /// Delete last character in search
    SearchBackspace,
    /// Clear the whole filter
    ClearSearch,
    /// Exit current mode (generic escape)
    ExitMode,

    // === Help Navigation ===
    /// Scroll help popup down
    HelpScrollDown,
    /// Scroll help popup up
    HelpScrollUp,

    // === Application ===
    /// Quit the application
    Quit,
}

impl Action {
    /// Get a human-readable description of the action
    pub fn description(&self) -> &'static str {
        match self {
            Action::Next => "Move to next item",
            Action::Previous => "Move to previous item",
            Action::First => "Jump to first item",
            Action::Last => "Jump to last item",
            Action::PageDown => "Page down",
            Action::PageUp => "Page up",

            Action::OpenSelected => "Open selected document",
            Action::ToggleFocus => "Switch focus (sidebar/content)",
            Action::ToggleSidebar => "Collapse/expand sidebar",

            Action::GoHome => "Back to home",
            Action::Reload => "Reload document",
            Action::BackToTop => "Back to top",
            Action::OpenViewer => "Open in browser",
            Action::OpenDirect => "Open direct link",
            Action::CopyUrl => "Copy document URL",

            Action::ToggleDarkMode => "Toggle dark mode",
            Action::ToggleHelp => "Toggle help",

            Action::EnterSearchMode => "Search documents",
            Action::ConfirmSearch => "Keep filter",
            Action::SearchBackspace => "Delete character",
            Action::ClearSearch => "Clear filter",
            Action::ExitMode => "Exit current mode",

            Action::HelpScrollDown => "Scroll help down",
            Action::HelpScrollUp => "Scroll help up",

            Action::Quit => "Quit",
        }
    }

    /// Get the category for grouping in help display
    pub fn category(&self) -> &'static str {
        match self {
            Action::Next
            | Action::Previous
            | Action::First
            | Action::Last
            | Action::PageDown
            | Action::PageUp => "Navigation",

            Action::OpenSelected | Action::ToggleFocus | Action::ToggleSidebar => "Sidebar",

            Action::GoHome
            | Action::Reload
            | Action::BackToTop
            | Action::OpenViewer
            | Action::OpenDirect
            | Action::CopyUrl => "Document",

            Action::ToggleDarkMode | Action::ToggleHelp => "View",

            Action::EnterSearchMode
            | Action::ConfirmSearch
            | Action::SearchBackspace
            | Action::ClearSearch
            | Action::ExitMode => "Search",

            Action::HelpScrollDown | Action::HelpScrollUp => "Help",

            Action::Quit => "Application",
        }
    }
}
