//! Markdown to styled terminal lines.
//!
//! Walks the pulldown-cmark event stream once and builds ratatui [`Line`]s.
//! Wrapping is left to the `Paragraph` that displays them, so one source line
//! may occupy several rows on screen.

use super::options;
use crate::tui::theme::{Theme, to_indexed};
use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use unicode_width::UnicodeWidthStr;

/// Syntax definitions and color schemes for fenced code, loaded once.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `markdown` for the content pane.
pub fn render(markdown: &str, theme: &Theme, highlighter: &Highlighter) -> Vec<Line<'static>> {
    let mut renderer = Renderer::new(theme, highlighter);
    for event in Parser::new_ext(markdown, options()) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct InlineState {
    emphasis: usize,
    strong: usize,
    strikethrough: usize,
    link_depth: usize,
}

#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    current_cell: String,
    in_head: bool,
}

struct Renderer<'a> {
    theme: &'a Theme,
    highlighter: &'a Highlighter,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    inline: InlineState,
    heading: Option<usize>,
    blockquote_depth: usize,
    /// Next number for ordered lists, `None` for bullets
    list_stack: Vec<Option<u64>>,
    code_block: Option<(String, String)>,
    table: Option<TableState>,
    link_target: Option<String>,
    image_alt: Option<String>,
    /// Fold syntect's RGB output when the theme is on the 256 palette
    fold_colors: bool,
}

impl<'a> Renderer<'a> {
    fn new(theme: &'a Theme, highlighter: &'a Highlighter) -> Self {
        Self {
            theme,
            highlighter,
            lines: Vec::new(),
            current: Vec::new(),
            inline: InlineState::default(),
            heading: None,
            blockquote_depth: 0,
            list_stack: Vec::new(),
            code_block: None,
            table: None,
            link_target: None,
            image_alt: None,
            fold_colors: matches!(theme.background, Color::Indexed(_)),
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::InlineHtml(raw) if self.table.is_some() => {
                self.emit(&raw, self.theme.muted_style());
            }
            Event::Html(raw) | Event::InlineHtml(raw) => {
                for (i, part) in raw.split('\n').enumerate() {
                    if i > 0 {
                        self.flush_line();
                    }
                    if !part.is_empty() {
                        self.push(part, self.theme.muted_style());
                    }
                }
            }
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.push(&"─".repeat(48), self.theme.muted_style());
                self.flush_line();
                self.blank_line();
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.push(marker, Style::default().fg(self.theme.list_bullet));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.flush_line();
                let level = heading_level(level);
                self.heading = Some(level);
                let style = Style::default()
                    .fg(self.theme.heading_color(level))
                    .add_modifier(Modifier::BOLD);
                self.push(&format!("{} ", "#".repeat(level)), style);
            }
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.blockquote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush_line();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or("").to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                self.code_block = Some((lang, String::new()));
            }
            Tag::List(start) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let depth = self.list_stack.len().saturating_sub(1);
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.push(
                    &format!("{}{}", "  ".repeat(depth), marker),
                    Style::default().fg(self.theme.list_bullet),
                );
            }
            Tag::Emphasis => self.inline.emphasis += 1,
            Tag::Strong => self.inline.strong += 1,
            Tag::Strikethrough => self.inline.strikethrough += 1,
            Tag::Link { dest_url, .. } => {
                self.inline.link_depth += 1;
                self.link_target = Some(dest_url.to_string());
            }
            Tag::Image { .. } => self.image_alt = Some(String::new()),
            Tag::Table(alignments) => {
                self.flush_line();
                self.table = Some(TableState {
                    alignments,
                    ..TableState::default()
                });
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                }
            }
            Tag::TableRow | Tag::TableCell => {}
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Heading(_) => {
                self.flush_line();
                self.heading = None;
                self.blank_line();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.blockquote_depth = self.blockquote_depth.saturating_sub(1);
                self.blank_line();
            }
            TagEnd::CodeBlock => {
                if let Some((lang, code)) = self.code_block.take() {
                    self.code_block(&lang, &code);
                }
                self.blank_line();
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::Emphasis => self.inline.emphasis = self.inline.emphasis.saturating_sub(1),
            TagEnd::Strong => self.inline.strong = self.inline.strong.saturating_sub(1),
            TagEnd::Strikethrough => {
                self.inline.strikethrough = self.inline.strikethrough.saturating_sub(1);
            }
            TagEnd::Link => {
                self.inline.link_depth = self.inline.link_depth.saturating_sub(1);
                if let Some(target) = self.link_target.take() {
                    if target.starts_with("http://") || target.starts_with("https://") {
                        self.emit(&format!(" <{target}>"), self.theme.muted_style());
                    }
                }
            }
            TagEnd::Image => {
                if let Some(alt) = self.image_alt.take() {
                    let alt = if alt.trim().is_empty() { "image" } else { alt.trim() };
                    self.emit(&format!("[image: {alt}]"), self.theme.link_style());
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.current_cell);
                    table.current_row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    // Header cells arrive without a TableRow wrapper
                    table.headers = std::mem::take(&mut table.current_row);
                    table.in_head = false;
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    if table.in_head {
                        table.headers = std::mem::take(&mut table.current_row);
                    } else {
                        let row = std::mem::take(&mut table.current_row);
                        table.rows.push(row);
                    }
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.table_lines(&table);
                }
                self.blank_line();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, code)) = self.code_block.as_mut() {
            code.push_str(text);
            return;
        }
        if let Some(alt) = self.image_alt.as_mut() {
            alt.push_str(text);
            return;
        }
        self.emit(text, self.inline_style());
    }

    fn inline_code(&mut self, code: &str) {
        self.emit(code, self.theme.inline_code_style());
    }

    fn soft_break(&mut self) {
        self.emit(" ", self.inline_style());
    }

    /// Inline output goes to the open table cell, if any, else to the current line.
    fn emit(&mut self, text: &str, style: Style) {
        match self.table.as_mut() {
            Some(table) => table.current_cell.push_str(text),
            None => self.push(text, style),
        }
    }

    fn inline_style(&self) -> Style {
        let mut style = if let Some(level) = self.heading {
            Style::default()
                .fg(self.theme.heading_color(level))
                .add_modifier(Modifier::BOLD)
        } else if self.blockquote_depth > 0 {
            Style::default().fg(self.theme.blockquote_fg)
        } else {
            self.theme.text_style()
        };

        if self.inline.strong > 0 {
            style = style.add_modifier(Modifier::BOLD);
            if self.heading.is_none() {
                style = style.fg(self.theme.bold_fg);
            }
        }
        if self.inline.emphasis > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.inline.strikethrough > 0 {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        if self.inline.link_depth > 0 {
            style = style.patch(self.theme.link_style());
        }
        style
    }

    fn push(&mut self, text: &str, style: Style) {
        if self.current.is_empty() && self.blockquote_depth > 0 {
            self.current.push(Span::styled(
                "│ ".repeat(self.blockquote_depth),
                Style::default().fg(self.theme.blockquote_border),
            ));
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(Line::from(spans));
        }
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|line| !line.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn code_block(&mut self, lang: &str, code: &str) {
        let fence = self.theme.code_fence_style();
        let label = if lang.is_empty() { "code" } else { lang };
        self.lines
            .push(Line::from(Span::styled(format!("┌─ {label}"), fence)));

        let assets: &'a Highlighter = self.highlighter;
        let syntax_set = &assets.syntax_set;
        let syntax = syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| syntax_set.find_syntax_plain_text());
        let mut highlighter = assets
            .theme_set
            .themes
            .get(self.theme.syntax_theme)
            .map(|scheme| HighlightLines::new(syntax, scheme));

        for line in LinesWithEndings::from(code) {
            let clean = line.trim_end_matches(['\n', '\r']);
            let mut spans = vec![Span::styled("│ ", fence)];

            let tokens = highlighter
                .as_mut()
                .and_then(|h| h.highlight_line(line, syntax_set).ok())
                .unwrap_or_default();

            if tokens.is_empty() {
                spans.push(Span::styled(clean.to_string(), self.theme.text_style()));
            } else {
                for (token_style, token) in tokens {
                    let token = token.trim_end_matches(['\n', '\r']);
                    if token.is_empty() {
                        continue;
                    }
                    let fg = token_style.foreground;
                    let mut color = Color::Rgb(fg.r, fg.g, fg.b);
                    if self.fold_colors {
                        color = to_indexed(color);
                    }
                    spans.push(Span::styled(token.to_string(), Style::default().fg(color)));
                }
            }
            self.lines.push(Line::from(spans));
        }

        self.lines.push(Line::from(Span::styled("└─", fence)));
    }

    fn table_lines(&mut self, table: &TableState) {
        let col_count = std::iter::once(&table.headers)
            .chain(table.rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        if col_count == 0 {
            return;
        }

        let mut widths = vec![3usize; col_count];
        for row in std::iter::once(&table.headers).chain(table.rows.iter()) {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.width());
            }
        }

        let border = Style::default().fg(self.theme.table_border);
        let header_style = Style::default()
            .fg(self.theme.heading_color(2))
            .add_modifier(Modifier::BOLD);

        if !table.headers.is_empty() {
            self.table_row(&table.headers, &widths, &table.alignments, header_style, border);
            let separator = widths
                .iter()
                .map(|w| "─".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("┼");
            self.lines
                .push(Line::from(Span::styled(format!("├{separator}┤"), border)));
        }
        for row in &table.rows {
            self.table_row(row, &widths, &table.alignments, self.theme.text_style(), border);
        }
    }

    fn table_row(
        &mut self,
        row: &[String],
        widths: &[usize],
        alignments: &[Alignment],
        style: Style,
        border: Style,
    ) {
        let mut spans = vec![Span::styled("│", border)];
        for (idx, width) in widths.iter().enumerate() {
            let cell = row.get(idx).map(String::as_str).unwrap_or("");
            let align = alignments.get(idx).copied().unwrap_or(Alignment::None);
            spans.push(Span::styled(format!(" {} ", pad(cell, *width, align)), style));
            spans.push(Span::styled("│", border));
        }
        self.lines.push(Line::from(spans));
    }
}

fn heading_level(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Pad `text` to `width` display columns.
fn pad(text: &str, width: usize, align: Alignment) -> String {
    let gap = width.saturating_sub(text.width());
    match align {
        Alignment::Right => format!("{}{}", " ".repeat(gap), text),
        Alignment::Center => {
            let left = gap / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(gap - left))
        }
        Alignment::Left | Alignment::None => format!("{}{}", text, " ".repeat(gap)),
    }
}

/// Plain text of a rendered line, for tests and searching.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}
