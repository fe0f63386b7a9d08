//! Markdown rendering.
//!
//! [`html`] produces sanitized HTML for export; [`text`] produces styled
//! terminal lines for the content pane. Both parse with the same extensions so
//! a document renders the same constructs either way.

pub mod html;
pub mod text;

pub use text::Highlighter;

use pulldown_cmark::Options;

/// Extensions enabled for every document: tables, strikethrough, task lists.
pub(crate) fn options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}
