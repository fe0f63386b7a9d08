mod layout;
mod popups;
mod util;

use layout::{DynamicLayout, Section};

use crate::catalog::DocumentEntry;
use crate::tui::app::{App, AppMode, Focus};
use crate::tui::theme::Theme;
use crate::view::{self, Breadcrumb, CardSection, ContentView, WELCOME_HEADING, WELCOME_INTRO};
use popups::render_help_popup;
use ratatui::Frame;
use ratatui::layout::{Constraint, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Wrap,
};
use unicode_width::UnicodeWidthStr;
use util::{icon_glyph, truncate_to_width};

/// Width of the sidebar when collapsed to a rail
const COLLAPSED_SIDEBAR_WIDTH: u16 = 5;

const BACK_TO_TOP_LABEL: &str = " ↑ Top (t) ";

pub fn render(frame: &mut Frame, app: &mut App) {
    // Clear expired status messages (auto-dismiss after timeout)
    app.clear_expired_status_message();

    let area = frame.area();
    frame.render_widget(Block::default().style(app.theme.content_style()), area);

    let main_layout = DynamicLayout::vertical(area)
        .section(Section::Title, Constraint::Length(2))
        .section(Section::Body, Constraint::Min(0))
        .section(Section::Status, Constraint::Length(1))
        .build();

    render_title_bar(frame, app, main_layout.require(Section::Title));

    let sidebar_width = if app.session.sidebar_collapsed() {
        COLLAPSED_SIDEBAR_WIDTH
    } else {
        app.sidebar_width
    };
    let body = DynamicLayout::horizontal(main_layout.require(Section::Body))
        .section(Section::Sidebar, Constraint::Length(sidebar_width))
        .section(Section::Content, Constraint::Min(0))
        .build();

    if app.session.sidebar_collapsed() {
        render_sidebar_rail(frame, app, body.require(Section::Sidebar));
    } else {
        render_sidebar(frame, app, body.require(Section::Sidebar));
    }

    let content_area = body.require(Section::Content);
    render_content(frame, app, content_area);

    if app.session.show_back_to_top() {
        render_back_to_top(frame, &app.theme, content_area);
    }

    render_status_bar(frame, app, main_layout.require(Section::Status));

    if app.mode == AppMode::Help {
        render_help_popup(frame, app, area);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " DevOps Study ",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", app.theme.muted_style()),
        Span::styled(
            view::header_title(&app.session),
            Style::default()
                .fg(app.theme.title_bar_fg)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let paragraph = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(app.theme.border_style(false)),
    );
    frame.render_widget(paragraph, area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Sidebar;

    let sections = DynamicLayout::vertical(area)
        .section(Section::Search, Constraint::Length(3))
        .section(Section::List, Constraint::Min(0))
        .build();

    // Search box
    let searching = app.mode == AppMode::Search;
    let query = app.session.search_query();
    let search_line = if query.is_empty() && !searching {
        Line::from(Span::styled("Search... (/)", theme.muted_style()))
    } else {
        let cursor = if searching { "▌" } else { "" };
        Line::from(vec![
            Span::styled("/ ", theme.muted_style()),
            Span::styled(
                format!("{query}{cursor}"),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    };
    let search = Paragraph::new(search_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(searching))
            .title(" Search "),
    );
    frame.render_widget(search, sections.require(Section::Search));

    // Document list, grouped
    let list_area = sections.require(Section::List);
    let label_width = usize::from(list_area.width.saturating_sub(6));
    let active = app.session.active_document();

    let mut items = Vec::new();
    let mut entry_rows = Vec::new();
    for (group, entries) in app.catalog.filtered(query) {
        if entries.is_empty() {
            continue;
        }
        items.push(ListItem::new(Line::from(Span::styled(
            group.name.to_uppercase(),
            Style::default()
                .fg(theme.heading_2)
                .add_modifier(Modifier::BOLD),
        ))));
        for entry in entries {
            entry_rows.push(items.len());
            items.push(sidebar_item(entry, active == Some(entry.path), label_width, theme));
        }
    }
    if items.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "No documents match",
            theme.muted_style(),
        ))));
    }

    // The app tracks selection over entries only; map it onto list rows
    let mut state = ListState::default();
    state.select(
        app.sidebar_state
            .selected()
            .and_then(|i| entry_rows.get(i).copied()),
    );

    let highlight = if focused {
        theme.selection_style()
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(focused))
                .title(" Documents "),
        )
        .style(theme.content_style())
        .highlight_style(highlight)
        .highlight_symbol("► ");

    frame.render_stateful_widget(list, list_area, &mut state);
}

fn sidebar_item(
    entry: &DocumentEntry,
    is_active: bool,
    width: usize,
    theme: &Theme,
) -> ListItem<'static> {
    let style = if is_active {
        Style::default()
            .fg(theme.active_fg)
            .add_modifier(Modifier::BOLD)
    } else {
        theme.text_style()
    };
    let title = truncate_to_width(entry.title, width.saturating_sub(2));
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{} ", icon_glyph(entry.icon)),
            Style::default().fg(theme.list_bullet),
        ),
        Span::styled(title, style),
    ]))
}

fn render_sidebar_rail(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let lines = vec![
        Line::from(Span::styled("»", Style::default().fg(theme.accent))),
        Line::from(""),
        Line::from(Span::styled("[", theme.muted_style())),
    ];
    let rail = Paragraph::new(lines)
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(false)),
        );
    frame.render_widget(rail, area);
}

fn render_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Content;
    let inner_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(3);
    app.viewport_height = inner_height;

    let (title, lines, scroll) = {
        let theme = &app.theme;
        match app.content_view() {
            ContentView::Loading { path } => (
                " Loading ".to_string(),
                loading_lines(path, theme),
                0,
            ),
            ContentView::Welcome { sections } => {
                let (lines, selected_row) =
                    welcome_lines(&sections, focused.then_some(app.card_selected), theme);
                let scroll = selected_row
                    .map(|row| row.saturating_sub(inner_height.saturating_sub(3)))
                    .unwrap_or(0);
                (" Welcome ".to_string(), lines, scroll)
            }
            ContentView::Pdf {
                breadcrumb,
                title,
                viewer_url,
                direct_url,
            } => (
                breadcrumb_title(&breadcrumb),
                pdf_lines(title, &viewer_url, &direct_url, theme),
                0,
            ),
            ContentView::Markdown { breadcrumb, .. } => {
                (breadcrumb_title(&breadcrumb), Vec::new(), app.content_scroll)
            }
        }
    };

    let is_document = app.session.active_document().is_some()
        && !app.session.is_loading()
        && !app.session.is_pdf_active();
    let lines = if is_document {
        let lines = app.document_lines().to_vec();
        app.content_height = wrapped_height(&lines, inner_width);
        app.clamp_after_layout();
        lines
    } else {
        app.content_height = 0;
        app.clamp_after_layout();
        lines
    };
    let scroll = if is_document { app.content_scroll } else { scroll };

    let theme = &app.theme;
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(focused))
                .title(title),
        )
        .style(theme.content_style())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    if is_document && app.content_height > inner_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .style(Style::default().fg(theme.scrollbar_fg));
        let mut state = ScrollbarState::new(usize::from(app.max_content_scroll()))
            .position(usize::from(app.content_scroll));
        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut state,
        );
    }
}

fn breadcrumb_title(breadcrumb: &Breadcrumb<'_>) -> String {
    format!(" {} ", breadcrumb.segments().join(" › "))
}

fn loading_lines(path: &str, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  ⟳ Loading {path}…"),
            theme.muted_style().add_modifier(Modifier::ITALIC),
        )),
    ]
}

/// Welcome page lines, plus the row of the selected card (if any)
fn welcome_lines(
    sections: &[CardSection<'_>],
    selected: Option<usize>,
    theme: &Theme,
) -> (Vec<Line<'static>>, Option<u16>) {
    let mut lines = vec![
        Line::from(Span::styled(
            WELCOME_HEADING,
            Style::default()
                .fg(theme.heading_1)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(WELCOME_INTRO, theme.text_style())),
    ];
    let mut selected_row = None;
    let mut card_index = 0;

    for section in sections {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            section.name.to_string(),
            Style::default()
                .fg(theme.heading_2)
                .add_modifier(Modifier::BOLD),
        )));
        for card in &section.cards {
            let is_selected = selected == Some(card_index);
            if is_selected {
                selected_row = u16::try_from(lines.len()).ok();
            }
            let (marker, title_style) = if is_selected {
                ("► ", theme.selection_style())
            } else {
                ("  ", theme.bold_style())
            };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(
                    format!("{} ", icon_glyph(card.icon)),
                    Style::default().fg(theme.list_bullet),
                ),
                Span::styled(card.title, title_style),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {}", view::card_blurb(card)),
                theme.muted_style(),
            )));
            card_index += 1;
        }
    }

    (lines, selected_row)
}

fn pdf_lines(title: &str, viewer_url: &str, direct_url: &str, theme: &Theme) -> Vec<Line<'static>> {
    let label = |text: &'static str| Span::styled(text, theme.muted_style());
    vec![
        Line::from(Span::styled(
            format!("▧ {title}"),
            Style::default()
                .fg(theme.heading_1)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "PDFs can't be shown in the terminal. Open one of these links instead:",
            theme.text_style(),
        )),
        Line::from(""),
        Line::from(vec![
            label("Viewer  "),
            Span::styled(viewer_url.to_string(), theme.link_style()),
        ]),
        Line::from(vec![
            label("Direct  "),
            Span::styled(direct_url.to_string(), theme.link_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("o", Style::default().fg(theme.accent)),
            label(" open viewer  "),
            Span::styled("O", Style::default().fg(theme.accent)),
            label(" open PDF  "),
            Span::styled("y", Style::default().fg(theme.accent)),
            label(" copy link"),
        ]),
    ]
}

/// Rows a paragraph takes once wrapped to `width` (estimated per character)
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_back_to_top(frame: &mut Frame, theme: &Theme, content_area: Rect) {
    let width = BACK_TO_TOP_LABEL.width() as u16;
    if content_area.width < width + 4 || content_area.height < 3 {
        return;
    }
    let badge = Rect {
        x: content_area.right() - width - 2,
        y: content_area.bottom() - 2,
        width,
        height: 1,
    };
    frame.render_widget(Clear, badge);
    frame.render_widget(Paragraph::new(BACK_TO_TOP_LABEL).style(theme.badge_style()), badge);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // If there's a status message, display it prominently
    if let Some(ref msg) = app.status_message {
        let status = Paragraph::new(format!(" {msg}")).style(
            app.theme
                .status_bar_style()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status, area);
        return;
    }

    let mode = match app.mode {
        AppMode::Normal => match app.focus {
            Focus::Sidebar => "Sidebar",
            Focus::Content => "Content",
        },
        AppMode::Search => "SEARCH",
        AppMode::Help => "HELP",
    };
    let hints = match app.mode {
        AppMode::Search => "Type to filter • Enter:Keep • Esc:Clear • ↑/↓:Move",
        _ => concat!(
            "Enter:Open • Tab:Focus • /:Search • [:Sidebar • ",
            "b:Home • D:Theme • ?:Help • q:Quit"
        ),
    };
    let theme_name = if app.session.is_dark_mode() { "Dark" } else { "Light" };

    let status_text = format!(
        " [{}] {} • {} • {} ",
        mode,
        hints,
        theme_name,
        app.source_name()
    );
    frame.render_widget(
        Paragraph::new(status_text).style(app.theme.status_bar_style()),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchedContent, PlaceholderSource};
    use crate::keybindings::{Action, Keybindings};
    use crate::tui::app::AppOptions;
    use crate::tui::terminal_compat::ColorMode;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn test_app() -> App {
        App::new(
            AppOptions {
                base_url: "https://host/base".to_string(),
                dark_mode: true,
                sidebar_width: 32,
                back_to_top_threshold: 300,
                color_mode: ColorMode::Rgb,
            },
            Arc::new(PlaceholderSource),
            Keybindings::default(),
        )
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn show_markdown(app: &mut App, path: &str, body: &str) {
        let entry = app.catalog.find(path).cloned().unwrap();
        let ticket = app.session.select_document(&entry).unwrap();
        app.session
            .complete_fetch(&ticket, Ok(FetchedContent::Markdown(body.to_string())));
    }

    #[test]
    fn test_welcome_screen() {
        let mut app = test_app();
        let screen = draw(&mut app);
        assert!(screen.contains("DevOps Study Dashboard"));
        assert!(screen.contains("Welcome to DevOps Study Dashboard"));
        assert!(screen.contains("AWS DOCUMENTATION"));
        assert!(screen.contains("API Gateway"));
        assert!(screen.contains("Click to view documentation about API Gateway."));
    }

    #[test]
    fn test_search_filters_sidebar() {
        let mut app = test_app();
        app.session.set_search_query("gke".to_string());
        let screen = draw(&mut app);
        assert!(screen.contains("GCP DOCUMENTATION"));
        assert!(!screen.contains("AWS DOCUMENTATION"));
        assert!(!screen.contains("PDF RESOURCES"));
    }

    #[test]
    fn test_no_matches_message() {
        let mut app = test_app();
        app.session.set_search_query("kubernetes-operator".to_string());
        let screen = draw(&mut app);
        assert!(screen.contains("No documents match"));
    }

    #[test]
    fn test_markdown_document() {
        let mut app = test_app();
        show_markdown(&mut app, "AWS/EC2.md", "# EC2\n\nElastic compute.");
        let screen = draw(&mut app);
        assert!(screen.contains("Home › AWS › EC2.md"));
        assert!(screen.contains("# EC2"));
        assert!(screen.contains("Elastic compute."));
    }

    #[test]
    fn test_pdf_document() {
        let mut app = test_app();
        let pdf = app.catalog.pdfs().entries[0].clone();
        app.select_entry(&pdf);
        let screen = draw(&mut app);
        assert!(screen.contains("AMI_Restoration_Troubleshooting_Guide.pdf"));
        assert!(screen.contains("https://docs.google.com/viewer?url="));
    }

    #[test]
    fn test_loading_indicator() {
        let mut app = test_app();
        let entry = app.catalog.find("GCP/GKE.md").cloned().unwrap();
        app.session.select_document(&entry);
        let screen = draw(&mut app);
        assert!(screen.contains("Loading GCP/GKE.md"));
    }

    #[test]
    fn test_collapsed_sidebar_hides_entries() {
        let mut app = test_app();
        app.handle_action(Action::ToggleSidebar);
        let screen = draw(&mut app);
        assert!(!screen.contains("AWS DOCUMENTATION"));
        assert!(screen.contains("Welcome to DevOps Study Dashboard"));
    }

    #[test]
    fn test_help_popup() {
        let mut app = test_app();
        app.handle_action(Action::ToggleHelp);
        let screen = draw(&mut app);
        assert!(screen.contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_back_to_top_badge() {
        let mut app = test_app();
        let body: String = (0..600).map(|i| format!("line {i}\n\n")).collect();
        show_markdown(&mut app, "AWS/S3.md", &body);
        draw(&mut app);
        app.set_content_scroll(400);
        let screen = draw(&mut app);
        assert!(screen.contains("↑ Top (t)"));
    }

    #[test]
    fn test_wrapped_height() {
        let lines = vec![Line::from("a".repeat(25)), Line::from("")];
        assert_eq!(wrapped_height(&lines, 10), 4);
    }
}
