use crate::catalog::{Catalog, DocumentEntry};
use crate::fetch::{DocumentSource, raw_url, viewer_url};
use crate::keybindings::{Action, KeybindingMode, Keybindings};
use crate::markdown::{Highlighter, text};
use crate::session::{FetchCommit, SessionState};
use crate::tui::help_text;
use crate::tui::terminal_compat::ColorMode;
use crate::tui::theme::Theme;
use crate::tui::worker::FetchWorker;
use crate::view::{self, ContentView};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;
use ratatui::widgets::ListState;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long a status message stays in the status bar
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(4);

/// Maximum search query length
const MAX_SEARCH_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Search,
    Help,
}

impl AppMode {
    fn keybinding_mode(self) -> KeybindingMode {
        match self {
            AppMode::Normal => KeybindingMode::Normal,
            AppMode::Search => KeybindingMode::Search,
            AppMode::Help => KeybindingMode::Help,
        }
    }
}

/// Startup options for [`App`].
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub base_url: String,
    pub dark_mode: bool,
    pub sidebar_width: u16,
    pub back_to_top_threshold: u16,
    pub color_mode: ColorMode,
}

/// Markdown lines cached for one (revision, theme) pair
struct RenderedDocument {
    revision: u64,
    dark: bool,
    lines: Vec<Line<'static>>,
}

pub struct App {
    pub session: SessionState,
    pub catalog: Catalog,
    pub mode: AppMode,
    pub focus: Focus,
    pub theme: Theme,
    pub sidebar_state: ListState,
    pub sidebar_width: u16,
    pub card_selected: usize,
    pub content_scroll: u16,
    /// Wrapped row count of the current document, measured while drawing
    pub content_height: u16,
    /// Visible rows of the content pane, measured while drawing
    pub viewport_height: u16,
    pub help_scroll: u16,
    pub status_message: Option<String>,
    status_set_at: Option<Instant>,
    pub should_quit: bool,
    base_url: String,
    color_mode: ColorMode,
    worker: FetchWorker,
    keybindings: Keybindings,
    highlighter: Highlighter,
    rendered: Option<RenderedDocument>,
    /// Bumped whenever new document content is committed
    content_revision: u64,
    // Persistent clipboard for Linux X11 compatibility
    // On Linux, the clipboard instance must stay alive to serve paste requests
    clipboard: Option<arboard::Clipboard>,
}

impl App {
    pub fn new(
        options: AppOptions,
        source: Arc<dyn DocumentSource>,
        keybindings: Keybindings,
    ) -> Self {
        let session = SessionState::new(options.dark_mode)
            .with_back_to_top_threshold(options.back_to_top_threshold);
        let theme = Theme::for_mode(options.dark_mode, options.color_mode);

        let mut sidebar_state = ListState::default();
        sidebar_state.select(Some(0));

        Self {
            session,
            catalog: Catalog::builtin(),
            mode: AppMode::Normal,
            focus: Focus::Sidebar,
            theme,
            sidebar_state,
            sidebar_width: options.sidebar_width,
            card_selected: 0,
            content_scroll: 0,
            content_height: 0,
            viewport_height: 0,
            help_scroll: 0,
            status_message: None,
            status_set_at: None,
            should_quit: false,
            base_url: options.base_url,
            color_mode: options.color_mode,
            worker: FetchWorker::new(source),
            keybindings,
            highlighter: Highlighter::new(),
            rendered: None,
            content_revision: 0,
            clipboard: arboard::Clipboard::new().ok(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn source_name(&self) -> &'static str {
        self.worker.source_name()
    }

    pub fn keybindings(&self) -> &Keybindings {
        &self.keybindings
    }

    /// The content view for the current state
    pub fn content_view(&self) -> ContentView<'_> {
        view::compose(&self.session, &self.catalog, &self.base_url)
    }

    /// Sidebar entries after filtering, flattened in group order
    pub fn visible_entries(&self) -> Vec<&DocumentEntry> {
        self.catalog
            .filtered(self.session.search_query())
            .into_iter()
            .flat_map(|(_, entries)| entries)
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&DocumentEntry> {
        let index = self.sidebar_state.selected()?;
        self.visible_entries().get(index).copied()
    }

    fn welcome_cards(&self) -> Vec<&DocumentEntry> {
        view::welcome_sections(&self.catalog)
            .into_iter()
            .flat_map(|section| section.cards)
            .collect()
    }

    fn is_welcome(&self) -> bool {
        !self.session.is_loading() && self.session.active_document().is_none()
    }

    // === Input ===

    pub fn handle_key(&mut self, key: KeyEvent) {
        let mode = self.mode.keybinding_mode();
        if let Some(action) = self.keybindings.dispatch(mode, key) {
            self.handle_action(action);
            return;
        }

        if self.mode == AppMode::Search {
            if let KeyCode::Char(c) = key.code {
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    self.search_input(c);
                }
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Next => self.move_by(1),
            Action::Previous => self.move_by(-1),
            Action::First => self.move_to_first(),
            Action::Last => self.move_to_last(),
            Action::PageDown => self.page(1),
            Action::PageUp => self.page(-1),

            Action::OpenSelected => self.open_selected(),
            Action::ToggleFocus => self.toggle_focus(),
            Action::ToggleSidebar => self.toggle_sidebar(),

            Action::GoHome => self.go_home(),
            Action::Reload => self.reload(),
            Action::BackToTop => self.back_to_top(),
            Action::OpenViewer => self.open_active(false),
            Action::OpenDirect => self.open_active(true),
            Action::CopyUrl => self.copy_url(),

            Action::ToggleDarkMode => self.toggle_dark_mode(),
            Action::ToggleHelp => self.toggle_help(),

            Action::EnterSearchMode => self.enter_search(),
            Action::ConfirmSearch => self.set_mode(AppMode::Normal),
            Action::SearchBackspace => self.search_backspace(),
            Action::ClearSearch => self.set_search(String::new()),
            Action::ExitMode => self.exit_search(),

            Action::HelpScrollDown => self.scroll_help_down(),
            Action::HelpScrollUp => self.scroll_help_up(),

            Action::Quit => self.should_quit = true,
        }
    }

    // === Fetch results ===

    /// Commit any fetch results that have arrived. Returns true if the view changed.
    pub fn poll_fetches(&mut self) -> bool {
        let mut changed = false;
        for outcome in self.worker.drain() {
            let error = outcome.result.as_ref().err().cloned();
            match self.session.complete_fetch(&outcome.ticket, outcome.result) {
                FetchCommit::Applied => {
                    tracing::info!(path = %outcome.ticket.path, "document loaded");
                    self.document_committed();
                    changed = true;
                }
                FetchCommit::Failed => {
                    if let Some(error) = error {
                        tracing::warn!(%error, "document failed to load");
                    }
                    self.document_committed();
                    self.set_status(format!("✗ Could not load {}", outcome.ticket.path));
                    changed = true;
                }
                FetchCommit::Discarded => {
                    tracing::debug!(
                        seq = outcome.ticket.seq,
                        path = %outcome.ticket.path,
                        "stale fetch discarded"
                    );
                }
            }
        }
        changed
    }

    fn document_committed(&mut self) {
        self.content_revision += 1;
        self.set_content_scroll(0);
    }

    // === Navigation ===

    fn move_by(&mut self, delta: i32) {
        match self.focus {
            Focus::Sidebar => {
                let len = self.visible_entries().len();
                let current = self.sidebar_state.selected().unwrap_or(0);
                self.sidebar_state.select(step(current, delta, len));
            }
            Focus::Content if self.is_welcome() => {
                let len = self.welcome_cards().len();
                self.card_selected = step(self.card_selected, delta, len).unwrap_or(0);
            }
            Focus::Content => self.scroll_content(delta),
        }
    }

    fn move_to_first(&mut self) {
        match self.focus {
            Focus::Sidebar => {
                let len = self.visible_entries().len();
                self.sidebar_state.select((len > 0).then_some(0));
            }
            Focus::Content if self.is_welcome() => self.card_selected = 0,
            Focus::Content => self.set_content_scroll(0),
        }
    }

    fn move_to_last(&mut self) {
        match self.focus {
            Focus::Sidebar => {
                let len = self.visible_entries().len();
                self.sidebar_state.select(len.checked_sub(1));
            }
            Focus::Content if self.is_welcome() => {
                self.card_selected = self.welcome_cards().len().saturating_sub(1);
            }
            Focus::Content => self.set_content_scroll(self.max_content_scroll()),
        }
    }

    fn page(&mut self, direction: i32) {
        if self.mode == AppMode::Help {
            let rows = 10;
            for _ in 0..rows {
                if direction > 0 {
                    self.scroll_help_down();
                } else {
                    self.scroll_help_up();
                }
            }
            return;
        }
        let rows = i32::from(self.viewport_height.max(2) - 1);
        match self.focus {
            Focus::Content if !self.is_welcome() => self.scroll_content(direction * rows),
            _ => self.move_by(direction * 10),
        }
    }

    fn scroll_content(&mut self, delta: i32) {
        let target = (i32::from(self.content_scroll) + delta).max(0);
        let target = u16::try_from(target).unwrap_or(u16::MAX);
        self.set_content_scroll(target.min(self.max_content_scroll()));
    }

    pub fn max_content_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Move the content pane and report the new offset to the session
    pub fn set_content_scroll(&mut self, offset: u16) {
        self.content_scroll = offset;
        self.session.scroll_observed(offset);
    }

    /// Keep scroll and selection inside bounds after a redraw measured them
    pub fn clamp_after_layout(&mut self) {
        if self.content_scroll > self.max_content_scroll() {
            self.set_content_scroll(self.max_content_scroll());
        }
        let len = self.visible_entries().len();
        match self.sidebar_state.selected() {
            Some(i) if i >= len => self.sidebar_state.select(len.checked_sub(1)),
            None if len > 0 => self.sidebar_state.select(Some(0)),
            _ => {}
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Content,
            Focus::Content if self.session.sidebar_collapsed() => Focus::Content,
            Focus::Content => Focus::Sidebar,
        };
    }

    fn toggle_sidebar(&mut self) {
        self.session.toggle_sidebar();
        if self.session.sidebar_collapsed() {
            self.focus = Focus::Content;
        }
    }

    // === Documents ===

    fn open_selected(&mut self) {
        let entry = match self.focus {
            Focus::Sidebar => self.selected_entry().cloned(),
            Focus::Content if self.is_welcome() => {
                self.welcome_cards().get(self.card_selected).copied().cloned()
            }
            Focus::Content => None,
        };
        if let Some(entry) = entry {
            self.select_entry(&entry);
        }
    }

    /// Select a document: PDFs switch immediately, Markdown starts a fetch.
    pub fn select_entry(&mut self, entry: &DocumentEntry) {
        tracing::info!(path = entry.path, kind = ?entry.kind, "document selected");
        match self.session.select_document(entry) {
            Some(ticket) => self.worker.dispatch(ticket),
            None => {
                self.document_committed();
                self.set_status("PDF opens in your browser: o viewer, O direct link");
            }
        }
    }

    fn reload(&mut self) {
        let entry = self
            .session
            .active_document()
            .and_then(|path| self.catalog.find(path))
            .cloned();
        match entry {
            Some(entry) => self.select_entry(&entry),
            None => self.set_status("⚠ No document to reload"),
        }
    }

    fn go_home(&mut self) {
        if self.session.active_document().is_some() {
            self.session.go_home();
            self.card_selected = 0;
            self.set_content_scroll(0);
        }
    }

    fn back_to_top(&mut self) {
        self.set_content_scroll(0);
    }

    /// URL opened by `o` (viewer for PDFs) or `O` (always the file itself)
    pub fn active_url(&self, direct: bool) -> Option<String> {
        let path = self.session.active_document()?;
        if self.session.is_pdf_active() && !direct {
            Some(viewer_url(&self.base_url, path))
        } else {
            Some(raw_url(&self.base_url, path))
        }
    }

    fn open_active(&mut self, direct: bool) {
        let Some(url) = self.active_url(direct) else {
            self.set_status("⚠ No document selected");
            return;
        };
        match open::that(&url) {
            Ok(()) => {
                tracing::info!(%url, "opened in browser");
                self.set_status(format!("✓ Opened {url}"));
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "could not open browser");
                self.set_status(format!("✗ Failed to open URL: {e}"));
            }
        }
    }

    fn copy_url(&mut self) {
        let Some(url) = self.active_url(true) else {
            self.set_status("⚠ No document selected");
            return;
        };
        let message = match &mut self.clipboard {
            Some(clipboard) => match clipboard.set_text(url.clone()) {
                Ok(()) => format!("✓ Copied {url}"),
                Err(e) => format!("✗ Clipboard error: {e}"),
            },
            None => "✗ Clipboard not available".to_string(),
        };
        self.set_status(message);
    }

    /// Styled lines of the active Markdown document, rendered once per content and theme
    pub fn document_lines(&mut self) -> &[Line<'static>] {
        let dark = self.session.is_dark_mode();
        let stale = self
            .rendered
            .as_ref()
            .is_none_or(|r| r.revision != self.content_revision || r.dark != dark);
        if stale {
            let lines = text::render(
                self.session.document_content(),
                &self.theme,
                &self.highlighter,
            );
            self.rendered = Some(RenderedDocument {
                revision: self.content_revision,
                dark,
                lines,
            });
        }
        self.rendered
            .as_ref()
            .map(|r| r.lines.as_slice())
            .unwrap_or_default()
    }

    // === View ===

    fn toggle_dark_mode(&mut self) {
        self.session.toggle_dark_mode();
        self.theme = Theme::for_mode(self.session.is_dark_mode(), self.color_mode);
    }

    /// Switch input mode; a key sequence begun in the old mode is dropped.
    fn set_mode(&mut self, mode: AppMode) {
        if self.mode != mode {
            self.keybindings.cancel_pending();
            self.mode = mode;
        }
    }

    pub fn toggle_help(&mut self) {
        if self.mode == AppMode::Help {
            self.set_mode(AppMode::Normal);
        } else {
            self.set_mode(AppMode::Help);
            self.help_scroll = 0; // Reset scroll when opening help
        }
    }

    pub fn scroll_help_down(&mut self) {
        let new_scroll = self.help_scroll.saturating_add(1);
        let max_scroll = help_text::build_help_text(&self.theme, &self.keybindings).len() as u16;
        if new_scroll < max_scroll {
            self.help_scroll = new_scroll;
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    // === Search ===

    fn enter_search(&mut self) {
        if self.session.sidebar_collapsed() {
            self.session.toggle_sidebar();
        }
        self.set_mode(AppMode::Search);
        self.focus = Focus::Sidebar;
    }

    fn exit_search(&mut self) {
        self.set_mode(AppMode::Normal);
        self.set_search(String::new());
    }

    pub fn search_input(&mut self, c: char) {
        if c.is_control() || self.session.search_query().chars().count() >= MAX_SEARCH_LEN {
            return;
        }
        let mut query = self.session.search_query().to_string();
        query.push(c);
        self.set_search(query);
    }

    fn search_backspace(&mut self) {
        let mut query = self.session.search_query().to_string();
        query.pop();
        self.set_search(query);
    }

    fn set_search(&mut self, query: String) {
        self.session.set_search_query(query);
        let len = self.visible_entries().len();
        self.sidebar_state.select((len > 0).then_some(0));
    }

    // === Status ===

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_set_at = Some(Instant::now());
    }

    pub fn clear_expired_status_message(&mut self) {
        if self
            .status_set_at
            .is_some_and(|at| at.elapsed() >= STATUS_MESSAGE_TTL)
        {
            self.status_message = None;
            self.status_set_at = None;
        }
    }
}

/// Move `current` by `delta` inside `0..len`, clamping at both ends
fn step(current: usize, delta: i32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let target = current as i64 + i64::from(delta);
    Some(target.clamp(0, len as i64 - 1) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, FetchResult, FetchedContent, PlaceholderSource, failure_message};

    struct MissingSource;

    impl DocumentSource for MissingSource {
        fn fetch(&self, path: &str) -> FetchResult {
            Err(FetchError::Status {
                path: path.to_string(),
                status: 404,
            })
        }

        fn name(&self) -> &'static str {
            "missing"
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(source: Arc<dyn DocumentSource>) -> App {
        App::new(
            AppOptions {
                base_url: "https://host/base".to_string(),
                dark_mode: true,
                sidebar_width: 32,
                back_to_top_threshold: 300,
                color_mode: ColorMode::Rgb,
            },
            source,
            Keybindings::default(),
        )
    }

    fn test_app() -> App {
        app_with(Arc::new(PlaceholderSource))
    }

    fn wait_for_document(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.session.is_loading() && Instant::now() < deadline {
            if let Some(outcome) = app.worker.wait(Duration::from_millis(50)) {
                app.session.complete_fetch(&outcome.ticket, outcome.result);
            }
        }
    }

    #[test]
    fn test_step_clamps() {
        assert_eq!(step(0, -1, 5), Some(0));
        assert_eq!(step(3, 1, 5), Some(4));
        assert_eq!(step(4, 1, 5), Some(4));
        assert_eq!(step(2, -10, 5), Some(0));
        assert_eq!(step(0, 1, 0), None);
    }

    #[test]
    fn test_open_markdown_from_sidebar() {
        let mut app = test_app();
        // First visible entry is API Gateway
        app.handle_key(key(KeyCode::Enter));
        assert!(app.session.is_loading());
        assert!(matches!(app.content_view(), ContentView::Loading { .. }));

        wait_for_document(&mut app);
        assert_eq!(app.session.active_document(), Some("AWS/API_Gateway.md"));
        assert!(app.session.document_content().starts_with("# API_Gateway"));
    }

    #[test]
    fn test_search_mode_filters_sidebar() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.mode, AppMode::Search);

        for c in "s3".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.session.search_query(), "s3");
        let titles: Vec<_> = app.visible_entries().iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["S3"]);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.search_query(), "s3");

        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.session.search_query(), "");
    }

    #[test]
    fn test_search_typing_q_does_not_quit() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.session.search_query(), "q");
    }

    #[test]
    fn test_pdf_selection_has_urls_and_no_fetch() {
        let mut app = test_app();
        let pdf = app.catalog.pdfs().entries[1].clone();
        app.select_entry(&pdf);

        assert!(!app.session.is_loading());
        assert!(app.session.is_pdf_active());
        assert_eq!(
            app.active_url(true).as_deref(),
            Some("https://host/base/AWS/123/AWS_Implementation_QA.pdf")
        );
        assert!(app.active_url(false).unwrap().starts_with("https://docs.google.com/viewer?url="));
        assert!(app.worker.wait(Duration::from_millis(100)).is_none());
    }

    #[test]
    fn test_failed_fetch_sets_status() {
        let mut app = app_with(Arc::new(MissingSource));
        let entry = app.catalog.find("GCP/GKE.md").cloned().unwrap();
        app.select_entry(&entry);

        let deadline = Instant::now() + Duration::from_secs(5);
        while !app.poll_fetches() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!app.session.is_loading());
        assert_eq!(app.session.document_content(), failure_message("GCP/GKE.md"));
        assert!(app.status_message.as_deref().unwrap_or("").contains("GCP/GKE.md"));
    }

    #[test]
    fn test_content_scroll_drives_back_to_top() {
        let mut app = test_app();
        let entry = app.catalog.find("AWS/EC2.md").cloned().unwrap();
        let ticket = app.session.select_document(&entry).unwrap();
        app.session
            .complete_fetch(&ticket, Ok(FetchedContent::Markdown("# EC2".into())));
        app.focus = Focus::Content;
        app.content_height = 1000;
        app.viewport_height = 40;

        app.set_content_scroll(350);
        assert!(app.session.show_back_to_top());
        app.handle_action(Action::BackToTop);
        assert_eq!(app.content_scroll, 0);
        assert!(!app.session.show_back_to_top());

        app.handle_action(Action::Last);
        assert_eq!(app.content_scroll, 960);
    }

    #[test]
    fn test_welcome_cards_navigation() {
        let mut app = test_app();
        app.handle_action(Action::ToggleFocus);
        assert_eq!(app.focus, Focus::Content);
        app.handle_action(Action::Last);
        assert_eq!(app.card_selected, 11);
        app.handle_action(Action::OpenSelected);
        // Last card is the sixth GCP entry
        assert_eq!(app.session.pending().map(|t| t.path.as_str()), Some("GCP/VPC.md"));
    }

    #[test]
    fn test_dark_mode_swaps_theme() {
        let mut app = test_app();
        let dark_bg = app.theme.background;
        app.handle_action(Action::ToggleDarkMode);
        assert!(!app.session.is_dark_mode());
        assert_ne!(app.theme.background, dark_bg);
    }

    #[test]
    fn test_collapsing_sidebar_moves_focus() {
        let mut app = test_app();
        app.handle_action(Action::ToggleSidebar);
        assert!(app.session.sidebar_collapsed());
        assert_eq!(app.focus, Focus::Content);
        // Search re-opens it
        app.handle_action(Action::EnterSearchMode);
        assert!(!app.session.sidebar_collapsed());
        assert_eq!(app.focus, Focus::Sidebar);
    }

    #[test]
    fn test_mode_switch_drops_partial_sequence() {
        let mut keybindings = Keybindings::default();
        keybindings
            .bind(KeybindingMode::Normal, "z z", Action::Quit)
            .unwrap();
        let mut app = App::new(
            AppOptions {
                base_url: "https://host/base".to_string(),
                dark_mode: false,
                sidebar_width: 32,
                back_to_top_threshold: 300,
                color_mode: ColorMode::Rgb,
            },
            Arc::new(PlaceholderSource),
            keybindings,
        );

        app.handle_key(key(KeyCode::Char('z')));
        app.handle_action(Action::ToggleHelp);
        app.handle_key(key(KeyCode::Char('?')));
        assert_eq!(app.mode, AppMode::Normal);

        app.handle_key(key(KeyCode::Char('z')));
        assert!(!app.should_quit);
        app.handle_key(key(KeyCode::Char('z')));
        assert!(app.should_quit);
    }
}
