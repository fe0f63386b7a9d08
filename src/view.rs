//! What the content pane shows, derived from session state.
//!
//! [`compose`] is a pure function: the same state always yields the same view,
//! and nothing here touches the terminal. The TUI draws whatever it returns.

use crate::catalog::{Catalog, DocumentEntry, file_name, top_segment};
use crate::fetch::{raw_url, viewer_url};
use crate::session::SessionState;

/// Cards shown per group on the welcome view.
pub const WELCOME_CARDS_PER_GROUP: usize = 6;

pub const DEFAULT_TITLE: &str = "DevOps Study Dashboard";
pub const WELCOME_HEADING: &str = "Welcome to DevOps Study Dashboard";
pub const WELCOME_INTRO: &str = "Select a document from the sidebar to get started.";

/// Home / group / file trail above a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb<'a> {
    pub group: &'a str,
    pub file: &'a str,
}

impl<'a> Breadcrumb<'a> {
    pub fn for_path(path: &'a str) -> Self {
        Self {
            group: top_segment(path),
            file: file_name(path),
        }
    }

    pub fn segments(&self) -> [&str; 3] {
        ["Home", self.group, self.file]
    }
}

/// A section of welcome cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSection<'a> {
    pub name: &'a str,
    pub cards: Vec<&'a DocumentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentView<'a> {
    Loading {
        path: &'a str,
    },
    Welcome {
        sections: Vec<CardSection<'a>>,
    },
    Pdf {
        breadcrumb: Breadcrumb<'a>,
        title: &'a str,
        viewer_url: String,
        direct_url: String,
    },
    Markdown {
        breadcrumb: Breadcrumb<'a>,
        content: &'a str,
    },
}

/// Choose the content branch: loading, welcome, PDF, or Markdown, in that order.
pub fn compose<'a>(
    state: &'a SessionState,
    catalog: &'a Catalog,
    base_url: &str,
) -> ContentView<'a> {
    if let Some(ticket) = state.pending() {
        return ContentView::Loading { path: &ticket.path };
    }

    let Some(path) = state.active_document() else {
        return ContentView::Welcome {
            sections: welcome_sections(catalog),
        };
    };

    let breadcrumb = Breadcrumb::for_path(path);
    if state.is_pdf_active() {
        ContentView::Pdf {
            title: breadcrumb.file,
            breadcrumb,
            viewer_url: viewer_url(base_url, path),
            direct_url: raw_url(base_url, path),
        }
    } else {
        ContentView::Markdown {
            breadcrumb,
            content: state.document_content(),
        }
    }
}

/// The first few entries of each Markdown group. PDFs are never featured.
pub fn welcome_sections(catalog: &Catalog) -> Vec<CardSection<'_>> {
    [catalog.aws(), catalog.gcp()]
        .into_iter()
        .map(|group| CardSection {
            name: group.name,
            cards: group.entries.iter().take(WELCOME_CARDS_PER_GROUP).collect(),
        })
        .collect()
}

/// Header title: active file name without `.md`, or the dashboard name.
pub fn header_title(state: &SessionState) -> String {
    match state.active_document() {
        Some(path) => file_name(path).replacen(".md", "", 1),
        None => DEFAULT_TITLE.to_string(),
    }
}

/// Card blurb under each welcome card title.
pub fn card_blurb(entry: &DocumentEntry) -> String {
    format!("Click to view documentation about {}.", entry.title)
}
