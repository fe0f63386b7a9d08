//! Dark and light color themes.
//!
//! The dashboard has exactly two looks, switched at runtime by the dark-mode
//! toggle. Colors are authored as RGB and folded onto the 256-color palette
//! when the terminal can't show true color.

use crate::tui::terminal_compat::ColorMode;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Dark,
    Light,
}

impl ThemeName {
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark { ThemeName::Dark } else { ThemeName::Light }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub heading_1: Color,
    pub heading_2: Color,
    pub heading_3: Color,
    pub heading_4: Color,
    pub border_focused: Color,
    pub border_unfocused: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub active_fg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub title_bar_fg: Color,
    pub inline_code_fg: Color,
    pub inline_code_bg: Color,
    pub bold_fg: Color,
    pub italic_fg: Color,
    pub list_bullet: Color,
    pub blockquote_border: Color,
    pub blockquote_fg: Color,
    pub code_fence: Color,
    pub link_fg: Color,
    pub table_border: Color,
    pub scrollbar_fg: Color,
    pub badge_bg: Color,
    pub badge_fg: Color,
    pub error_fg: Color,
    /// syntect theme used for fenced code
    pub syntax_theme: &'static str,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    /// Theme for the given dark-mode flag, adapted to the terminal's colors.
    pub fn for_mode(dark: bool, color_mode: ColorMode) -> Self {
        Self::from_name(ThemeName::from_dark_mode(dark)).with_color_mode(color_mode)
    }

    pub fn dark() -> Self {
        Self {
            name: "Dark",
            background: Color::Rgb(22, 27, 34),
            foreground: Color::Rgb(201, 209, 217),
            muted: Color::Rgb(110, 118, 129),
            accent: Color::Rgb(255, 153, 0),
            heading_1: Color::Rgb(255, 166, 87),
            heading_2: Color::Rgb(121, 192, 255),
            heading_3: Color::Rgb(126, 231, 135),
            heading_4: Color::Rgb(210, 168, 255),
            border_focused: Color::Rgb(88, 166, 255),
            border_unfocused: Color::Rgb(48, 54, 61),
            selection_bg: Color::Rgb(56, 68, 88),
            selection_fg: Color::Rgb(240, 246, 252),
            active_fg: Color::Rgb(255, 153, 0),
            status_bar_bg: Color::Rgb(33, 38, 45),
            status_bar_fg: Color::Rgb(201, 209, 217),
            title_bar_fg: Color::Rgb(88, 166, 255),
            inline_code_fg: Color::Rgb(255, 123, 114),
            inline_code_bg: Color::Rgb(45, 51, 59),
            bold_fg: Color::Rgb(240, 246, 252),
            italic_fg: Color::Rgb(201, 209, 217),
            list_bullet: Color::Rgb(88, 166, 255),
            blockquote_border: Color::Rgb(61, 68, 77),
            blockquote_fg: Color::Rgb(139, 148, 158),
            code_fence: Color::Rgb(110, 118, 129),
            link_fg: Color::Rgb(88, 166, 255),
            table_border: Color::Rgb(61, 68, 77),
            scrollbar_fg: Color::Rgb(72, 79, 88),
            badge_bg: Color::Rgb(35, 134, 54),
            badge_fg: Color::Rgb(240, 246, 252),
            error_fg: Color::Rgb(248, 81, 73),
            syntax_theme: "base16-ocean.dark",
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light",
            background: Color::Rgb(255, 255, 255),
            foreground: Color::Rgb(36, 41, 47),
            muted: Color::Rgb(101, 109, 118),
            accent: Color::Rgb(191, 90, 0),
            heading_1: Color::Rgb(149, 56, 0),
            heading_2: Color::Rgb(9, 105, 218),
            heading_3: Color::Rgb(26, 127, 55),
            heading_4: Color::Rgb(130, 80, 223),
            border_focused: Color::Rgb(9, 105, 218),
            border_unfocused: Color::Rgb(208, 215, 222),
            selection_bg: Color::Rgb(221, 244, 255),
            selection_fg: Color::Rgb(36, 41, 47),
            active_fg: Color::Rgb(191, 90, 0),
            status_bar_bg: Color::Rgb(246, 248, 250),
            status_bar_fg: Color::Rgb(36, 41, 47),
            title_bar_fg: Color::Rgb(9, 105, 218),
            inline_code_fg: Color::Rgb(207, 34, 46),
            inline_code_bg: Color::Rgb(239, 242, 245),
            bold_fg: Color::Rgb(31, 35, 40),
            italic_fg: Color::Rgb(36, 41, 47),
            list_bullet: Color::Rgb(9, 105, 218),
            blockquote_border: Color::Rgb(208, 215, 222),
            blockquote_fg: Color::Rgb(101, 109, 118),
            code_fence: Color::Rgb(140, 149, 159),
            link_fg: Color::Rgb(9, 105, 218),
            table_border: Color::Rgb(208, 215, 222),
            scrollbar_fg: Color::Rgb(175, 184, 193),
            badge_bg: Color::Rgb(31, 136, 61),
            badge_fg: Color::Rgb(255, 255, 255),
            error_fg: Color::Rgb(207, 34, 46),
            syntax_theme: "InspiredGitHub",
        }
    }

    /// Fold every RGB color onto the 256-color palette when needed.
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        if mode == ColorMode::Rgb {
            return self;
        }
        for color in [
            &mut self.background,
            &mut self.foreground,
            &mut self.muted,
            &mut self.accent,
            &mut self.heading_1,
            &mut self.heading_2,
            &mut self.heading_3,
            &mut self.heading_4,
            &mut self.border_focused,
            &mut self.border_unfocused,
            &mut self.selection_bg,
            &mut self.selection_fg,
            &mut self.active_fg,
            &mut self.status_bar_bg,
            &mut self.status_bar_fg,
            &mut self.title_bar_fg,
            &mut self.inline_code_fg,
            &mut self.inline_code_bg,
            &mut self.bold_fg,
            &mut self.italic_fg,
            &mut self.list_bullet,
            &mut self.blockquote_border,
            &mut self.blockquote_fg,
            &mut self.code_fence,
            &mut self.link_fg,
            &mut self.table_border,
            &mut self.scrollbar_fg,
            &mut self.badge_bg,
            &mut self.badge_fg,
            &mut self.error_fg,
        ] {
            *color = to_indexed(*color);
        }
        self
    }

    pub fn heading_color(&self, level: usize) -> Color {
        match level {
            1 => self.heading_1,
            2 => self.heading_2,
            3 => self.heading_3,
            _ => self.heading_4,
        }
    }

    pub fn content_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border_unfocused)
        }
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default().bg(self.status_bar_bg).fg(self.status_bar_fg)
    }

    pub fn bold_style(&self) -> Style {
        Style::default()
            .fg(self.bold_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn italic_style(&self) -> Style {
        Style::default()
            .fg(self.italic_fg)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn inline_code_style(&self) -> Style {
        Style::default()
            .fg(self.inline_code_fg)
            .bg(self.inline_code_bg)
    }

    pub fn code_fence_style(&self) -> Style {
        Style::default().fg(self.code_fence)
    }

    pub fn link_style(&self) -> Style {
        Style::default()
            .fg(self.link_fg)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn badge_style(&self) -> Style {
        Style::default()
            .bg(self.badge_bg)
            .fg(self.badge_fg)
            .add_modifier(Modifier::BOLD)
    }

    // Popups share the status bar palette
    pub fn modal_bg(&self) -> Color {
        self.status_bar_bg
    }

    pub fn modal_border(&self) -> Color {
        self.border_focused
    }

    pub fn modal_title(&self) -> Color {
        self.heading_1
    }

    pub fn modal_description(&self) -> Color {
        self.muted
    }

    pub fn modal_key_fg(&self) -> Color {
        self.accent
    }
}

/// Nearest xterm-256 color for an RGB value. Non-RGB colors pass through.
pub fn to_indexed(color: Color) -> Color {
    let Color::Rgb(r, g, b) = color else {
        return color;
    };

    // Grayscale ramp 232..=255 covers 8..=238 in steps of 10
    if r == g && g == b {
        return match r {
            0..=3 => Color::Indexed(16),
            248..=255 => Color::Indexed(231),
            _ => Color::Indexed(232 + ((r.saturating_sub(8) as u16 * 24 / 240) as u8).min(23)),
        };
    }

    let level = |c: u8| -> u8 {
        match c {
            0..=47 => 0,
            48..=114 => 1,
            _ => (c - 35) / 40,
        }
    };
    Color::Indexed(16 + 36 * level(r) + 6 * level(g) + level(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_and_light_differ() {
        let dark = Theme::from_name(ThemeName::Dark);
        let light = Theme::from_name(ThemeName::Light);
        assert_ne!(dark.background, light.background);
        assert_eq!(ThemeName::from_dark_mode(true), ThemeName::Dark);
        assert_eq!(ThemeName::from_dark_mode(false), ThemeName::Light);
    }

    #[test]
    fn test_indexed_mode_removes_rgb() {
        let theme = Theme::for_mode(true, ColorMode::Indexed256);
        assert!(matches!(theme.background, Color::Indexed(_)));
        assert!(matches!(theme.link_fg, Color::Indexed(_)));

        let rgb = Theme::for_mode(true, ColorMode::Rgb);
        assert!(matches!(rgb.background, Color::Rgb(..)));
    }

    #[test]
    fn test_to_indexed_anchors() {
        assert_eq!(to_indexed(Color::Rgb(0, 0, 0)), Color::Indexed(16));
        assert_eq!(to_indexed(Color::Rgb(255, 255, 255)), Color::Indexed(231));
        assert_eq!(to_indexed(Color::Rgb(255, 0, 0)), Color::Indexed(196));
        assert_eq!(to_indexed(Color::Rgb(0, 0, 255)), Color::Indexed(21));
        assert_eq!(to_indexed(Color::Red), Color::Red);
    }
}
