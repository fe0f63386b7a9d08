//! # studydash
//!
//! A terminal dashboard for browsing a fixed catalog of AWS and GCP study notes.
//!
//! Markdown documents are fetched from a static file host and rendered either to
//! styled terminal lines or to sanitized HTML. PDF documents are never fetched:
//! they are offered as links to an embedded viewer.
//!
//! ## Features
//!
//! - Built-in catalog in three groups (AWS, GCP, PDF resources) with title search
//! - Background fetching; late results for abandoned selections are dropped
//! - GitHub-flavored Markdown (tables, strikethrough, task lists) with highlighted code
//! - Dark and light themes, collapsible sidebar, back-to-top badge
//!
//! ## Example
//!
//! ```rust
//! use studydash::catalog::Catalog;
//! use studydash::fetch::FetchedContent;
//! use studydash::markdown::html;
//! use studydash::session::SessionState;
//!
//! let catalog = Catalog::builtin();
//! let mut state = SessionState::default();
//!
//! let entry = catalog.find("AWS/EC2.md").unwrap();
//! let ticket = state.select_document(entry).expect("markdown needs a fetch");
//! state.complete_fetch(&ticket, Ok(FetchedContent::Markdown("# EC2".into())));
//!
//! assert!(html::render(state.document_content()).contains("<h1>EC2</h1>"));
//! ```

/// The built-in document catalog and title filtering.
pub mod catalog;

/// Configuration module for user preferences.
///
/// Provides configuration loading for UI defaults, the document source, and terminal preferences.
pub mod config;

/// Document sources: HTTP fetching and offline placeholders.
pub mod fetch;

/// Keybindings module for customizable keyboard shortcuts.
///
/// Provides a modal keybinding system that allows users to customize
/// keyboard shortcuts via configuration file.
pub mod keybindings;

pub mod logging;

/// Markdown rendering to HTML and to terminal lines.
pub mod markdown;

/// Session state and its transitions.
pub mod session;

/// TUI module for interactive terminal interface.
///
/// Provides the App and UI rendering functionality for the dashboard.
pub mod tui;

/// Content view composition.
pub mod view;

pub use catalog::{Catalog, CatalogGroup, DocumentEntry, DocumentKind};
pub use config::Config;
pub use fetch::{DocumentSource, FetchError, FetchedContent, HttpSource, PlaceholderSource};
pub use keybindings::{Action, KeybindingMode, Keybindings};
pub use session::{FetchCommit, FetchTicket, SessionState};
pub use tui::App;
