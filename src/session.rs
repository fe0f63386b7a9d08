//! Navigation and search state for one browsing session.
//!
//! [`SessionState`] is the single owner of everything the content pane depends
//! on. It is only mutated through the named transitions below; the UI reads it
//! and redraws. Fetches are asynchronous: [`SessionState::select_document`]
//! hands back a [`FetchTicket`] for the caller to dispatch, and the result comes
//! back through [`SessionState::complete_fetch`]. Only the ticket issued last is
//! accepted, so a slow response for an earlier click can never replace the
//! document the user asked for most recently.

use crate::catalog::{DocumentEntry, DocumentKind};
use crate::fetch::{FetchResult, failure_message};

/// Scroll offset past which the back-to-top badge is shown.
pub const BACK_TO_TOP_THRESHOLD: u16 = 300;

/// Sessions start in light mode.
pub const DEFAULT_DARK_MODE: bool = false;

/// Tag attached to an outstanding fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub path: String,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchCommit {
    /// Content committed to the session.
    Applied,
    /// The fetch failed; the failure message was committed instead.
    Failed,
    /// A newer selection superseded this fetch; nothing changed.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    active_document: Option<String>,
    document_content: String,
    is_pdf_active: bool,
    search_query: String,
    sidebar_collapsed: bool,
    is_dark_mode: bool,
    show_back_to_top: bool,
    scroll_offset: u16,
    back_to_top_threshold: u16,
    pending: Option<FetchTicket>,
    next_seq: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_DARK_MODE)
    }
}

impl SessionState {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            active_document: None,
            document_content: String::new(),
            is_pdf_active: false,
            search_query: String::new(),
            sidebar_collapsed: false,
            is_dark_mode: dark_mode,
            show_back_to_top: false,
            scroll_offset: 0,
            back_to_top_threshold: BACK_TO_TOP_THRESHOLD,
            pending: None,
            next_seq: 0,
        }
    }

    /// Override the back-to-top threshold (rows of scroll).
    pub fn with_back_to_top_threshold(mut self, threshold: u16) -> Self {
        self.back_to_top_threshold = threshold;
        self
    }

    pub fn active_document(&self) -> Option<&str> {
        self.active_document.as_deref()
    }

    pub fn document_content(&self) -> &str {
        &self.document_content
    }

    pub fn is_pdf_active(&self) -> bool {
        self.is_pdf_active
    }

    /// True exactly while a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&FetchTicket> {
        self.pending.as_ref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    pub fn is_dark_mode(&self) -> bool {
        self.is_dark_mode
    }

    pub fn show_back_to_top(&self) -> bool {
        self.show_back_to_top
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn is_active(&self, path: &str) -> bool {
        self.active_document.as_deref() == Some(path)
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.is_dark_mode = !self.is_dark_mode;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Start showing `entry`.
    ///
    /// PDFs have nothing to fetch and are committed immediately. Markdown
    /// entries put the session into the loading state and return the ticket the
    /// caller must dispatch; any earlier outstanding ticket is superseded.
    pub fn select_document(&mut self, entry: &DocumentEntry) -> Option<FetchTicket> {
        match entry.kind {
            DocumentKind::Pdf => {
                self.pending = None;
                self.commit(entry.path.to_string(), String::new(), true);
                None
            }
            DocumentKind::Markdown => {
                self.next_seq += 1;
                let ticket = FetchTicket {
                    seq: self.next_seq,
                    path: entry.path.to_string(),
                };
                self.pending = Some(ticket.clone());
                Some(ticket)
            }
        }
    }

    /// Commit the outcome of a fetch dispatched for `ticket`.
    ///
    /// Content, PDF flag, active document and loading flag change together.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, result: FetchResult) -> FetchCommit {
        if self.pending.as_ref() != Some(ticket) {
            return FetchCommit::Discarded;
        }
        self.pending = None;

        match result {
            Ok(content) => {
                let is_pdf = content.kind() == DocumentKind::Pdf;
                self.commit(ticket.path.clone(), content.into_text(), is_pdf);
                FetchCommit::Applied
            }
            Err(_) => {
                self.commit(ticket.path.clone(), failure_message(&ticket.path), false);
                FetchCommit::Failed
            }
        }
    }

    /// Return to the welcome view. The last content is kept but no longer shown.
    pub fn go_home(&mut self) {
        if self.active_document.is_some() {
            self.active_document = None;
        }
    }

    /// Record the content pane's scroll offset.
    pub fn scroll_observed(&mut self, offset: u16) {
        self.scroll_offset = offset;
        self.show_back_to_top = offset > self.back_to_top_threshold;
    }

    fn commit(&mut self, path: String, content: String, is_pdf: bool) {
        self.document_content = content;
        self.is_pdf_active = is_pdf;
        self.active_document = Some(path);
        self.scroll_observed(0);
    }
}
