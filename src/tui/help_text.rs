use crate::keybindings::{KeybindingMode, Keybindings};
use crate::tui::theme::Theme;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Key column width for keybindings
const KEY_COLUMN_WIDTH: usize = 14;

const SCROLL_HINT: &str = "Use j/k or ↓/↑ to scroll | Press Esc or ? to close";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpLine {
    Title(&'static str),
    Description(&'static str),
    SectionHeader(String),
    KeyBinding { key: String, desc: &'static str },
    Note(&'static str),
    Blank,
}

impl HelpLine {
    /// Convert this help line to a styled ratatui Line
    pub fn to_line(&self, theme: &Theme) -> Line<'static> {
        match self {
            HelpLine::Title(text) => Line::from(vec![Span::styled(
                text.to_string(),
                Style::default()
                    .fg(theme.modal_title())
                    .add_modifier(Modifier::BOLD),
            )]),
            HelpLine::Description(text) => Line::from(vec![Span::styled(
                text.to_string(),
                Style::default()
                    .fg(theme.modal_description())
                    .add_modifier(Modifier::ITALIC),
            )]),
            HelpLine::SectionHeader(text) => Line::from(vec![Span::styled(
                text.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            HelpLine::KeyBinding { key, desc } => {
                let formatted_key = format!("  {:<width$}", key, width = KEY_COLUMN_WIDTH);
                Line::from(vec![
                    Span::styled(formatted_key, Style::default().fg(theme.modal_key_fg())),
                    Span::raw(desc.to_string()),
                ])
            }
            HelpLine::Note(text) => Line::from(vec![
                Span::styled(
                    "Note: ".to_string(),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    text.to_string(),
                    Style::default().fg(theme.modal_description()),
                ),
            ]),
            HelpLine::Blank => Line::from(""),
        }
    }
}

/// Help content generated from the active keybindings, so user overrides show up.
pub fn help_lines(keybindings: &Keybindings) -> Vec<HelpLine> {
    let mut lines = vec![
        HelpLine::Title("DevOps Study Dashboard - Keyboard Shortcuts"),
        HelpLine::Description(SCROLL_HINT),
        HelpLine::Blank,
    ];

    let mut current_category = None;
    for (action, keys) in keybindings.help_entries(KeybindingMode::Normal) {
        if current_category != Some(action.category()) {
            if current_category.is_some() {
                lines.push(HelpLine::Blank);
            }
            current_category = Some(action.category());
            lines.push(HelpLine::SectionHeader(action.category().to_string()));
        }
        lines.push(HelpLine::KeyBinding {
            key: keys.join("/"),
            desc: action.description(),
        });
    }

    let search = keybindings.help_entries(KeybindingMode::Search);
    if !search.is_empty() {
        lines.push(HelpLine::Blank);
        lines.push(HelpLine::SectionHeader(format!(
            "{} Mode",
            KeybindingMode::Search.label()
        )));
        for (action, keys) in search {
            lines.push(HelpLine::KeyBinding {
                key: keys.join("/"),
                desc: action.description(),
            });
        }
    }

    lines.push(HelpLine::Blank);
    lines.push(HelpLine::Note(
        "PDFs open in your browser. Use o for the viewer or O for the file itself",
    ));
    lines.push(HelpLine::Blank);
    lines.push(HelpLine::Description(SCROLL_HINT));
    lines
}

/// Build the help text with theme colors applied
pub fn build_help_text(theme: &Theme, keybindings: &Keybindings) -> Vec<Line<'static>> {
    help_lines(keybindings)
        .iter()
        .map(|line| line.to_line(theme))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_default_keys() {
        let lines = help_lines(&Keybindings::default());
        let has = |needle: &str| {
            lines.iter().any(|line| match line {
                HelpLine::KeyBinding { key, desc } => {
                    key.contains(needle) || desc.contains(needle)
                }
                _ => false,
            })
        };
        assert!(has("?"));
        assert!(has("Tab"));
        assert!(lines.contains(&HelpLine::SectionHeader("Navigation".to_string())));
        assert!(lines.contains(&HelpLine::SectionHeader("Search Mode".to_string())));
    }

    #[test]
    fn test_help_text_starts_with_title() {
        let lines = build_help_text(&Theme::dark(), &Keybindings::default());
        assert_eq!(
            lines[0].spans[0].content.as_ref(),
            "DevOps Study Dashboard - Keyboard Shortcuts"
        );
        assert_eq!(lines.len(), help_lines(&Keybindings::default()).len());
    }
}
