//! Utility functions for UI rendering
//!
//! Pure functions for layout calculations and text fitting.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Calculate a centered rectangular area within a parent area.
///
/// Returns a `Rect` that is centered both horizontally and vertically,
/// sized as a percentage of the parent area.
///
/// # Arguments
/// * `area` - The parent area to center within
/// * `percent_x` - Width as a percentage of parent (0-100)
/// * `percent_y` - Height as a percentage of parent (0-100)
pub fn centered_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Centered popup sized by percentage, but never smaller than `min_width` x `min_height`
/// (and never larger than the parent).
pub fn popup_area(
    area: Rect,
    percent_x: u16,
    percent_y: u16,
    min_width: u16,
    min_height: u16,
) -> Rect {
    let scaled = centered_area(area, percent_x, percent_y);
    let width = scaled.width.max(min_width).min(area.width);
    let height = scaled.height.max(min_height).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Terminal glyph for a Font Awesome icon class.
///
/// Unknown classes fall back to a generic document glyph.
pub fn icon_glyph(icon: &str) -> &'static str {
    let name = icon
        .split_whitespace()
        .find(|class| class.starts_with("fa-") && *class != "fa-solid" && *class != "fa-brands")
        .unwrap_or("");
    match name {
        "fa-network-wired" => "⇄",
        "fa-server" => "▤",
        "fa-database" => "◫",
        "fa-hard-drive" | "fa-hdd" => "▥",
        "fa-globe" => "◍",
        "fa-chart-line" => "↗",
        "fa-layer-group" => "≣",
        "fa-ship" => "⚓",
        "fa-user-shield" => "⛨",
        "fa-code" => "λ",
        "fa-route" => "↝",
        "fa-cube" => "▣",
        "fa-bell" => "♪",
        "fa-bolt" => "ϟ",
        "fa-dharmachakra" => "☸",
        "fa-exchange-alt" => "⇆",
        "fa-terminal" => "›",
        "fa-file-pdf" => "▧",
        _ => "•",
    }
}

/// Cut `text` to at most `width` display columns, ending with `…` when shortened.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    mod centered_area_tests {
        use super::*;

        #[test]
        fn test_centered_full_size() {
            let parent = Rect::new(0, 0, 100, 50);
            let result = centered_area(parent, 100, 100);
            assert_eq!(result.width, 100);
            assert_eq!(result.height, 50);
        }

        #[test]
        fn test_centered_half_size() {
            let parent = Rect::new(0, 0, 100, 50);
            let result = centered_area(parent, 50, 50);
            assert_eq!(result.width, 50);
            assert_eq!(result.height, 25);
            assert!(result.x >= 24 && result.x <= 26); // Allow for rounding
            assert!(result.y >= 11 && result.y <= 13);
        }
    }

    mod popup_area_tests {
        use super::*;

        #[test]
        fn test_minimum_size_applies() {
            let parent = Rect::new(0, 0, 50, 20);
            let result = popup_area(parent, 10, 10, 40, 10);
            assert_eq!(result.width, 40);
            assert_eq!(result.height, 10);
            assert_eq!(result.x, 5);
            assert_eq!(result.y, 5);
        }

        #[test]
        fn test_never_exceeds_parent() {
            let parent = Rect::new(2, 3, 30, 8);
            let result = popup_area(parent, 70, 80, 40, 10);
            assert_eq!(result, parent);
        }
    }

    #[test]
    fn test_icon_glyph() {
        assert_eq!(icon_glyph("fa-solid fa-server"), "▤");
        assert_eq!(icon_glyph("fa-solid fa-file-pdf"), "▧");
        assert_eq!(icon_glyph("fa-solid fa-unknown"), "•");
        assert_eq!(icon_glyph(""), "•");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Lambda", 10), "Lambda");
        assert_eq!(truncate_to_width("CloudFormation", 6), "Cloud…");
        assert_eq!(truncate_to_width("日本語", 4), "日…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
