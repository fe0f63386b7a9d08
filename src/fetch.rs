//! Retrieving document content from the static file host.
//!
//! A [`DocumentSource`] turns a catalog path into content. PDFs never touch the
//! network: they are handed to an external viewer, so the source only reports
//! that the path is a PDF. Markdown is fetched with a single GET against
//! `base_url/path`.

use crate::catalog::{DocumentKind, file_name};
use reqwest::blocking::Client;
use std::time::Duration;
use thiserror::Error;

/// Where the dashboard's documents live.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/mushahid25/AWS-GCP/dashboard";

/// External viewer used to display PDFs inline in a browser.
pub const PDF_VIEWER_URL: &str = "https://docs.google.com/viewer";

/// Successful result of a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchedContent {
    /// Raw Markdown text, unmodified.
    Markdown(String),
    /// The path names a PDF; there is no text to show.
    Pdf,
}

impl FetchedContent {
    pub fn kind(&self) -> DocumentKind {
        match self {
            FetchedContent::Markdown(_) => DocumentKind::Markdown,
            FetchedContent::Pdf => DocumentKind::Pdf,
        }
    }

    /// Text to store as the session's document content (empty for PDFs).
    pub fn into_text(self) -> String {
        match self {
            FetchedContent::Markdown(text) => text,
            FetchedContent::Pdf => String::new(),
        }
    }
}

/// Ways a fetch can fail. Every variant carries the requested path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{path}: server answered with status {status}")]
    Status { path: String, status: u16 },

    #[error("{path}: request failed: {message}")]
    Transport { path: String, message: String },

    #[error("{path}: response body is not valid text: {message}")]
    Body { path: String, message: String },
}

impl FetchError {
    pub fn path(&self) -> &str {
        match self {
            FetchError::Status { path, .. }
            | FetchError::Transport { path, .. }
            | FetchError::Body { path, .. } => path,
        }
    }
}

pub type FetchResult = Result<FetchedContent, FetchError>;

/// Anything that can produce document content for a catalog path.
///
/// Implementations must not touch the network for PDF paths.
pub trait DocumentSource: Send + Sync {
    fn fetch(&self, path: &str) -> FetchResult;

    /// Short name used in logs and the status bar.
    fn name(&self) -> &'static str;
}

/// Fetches raw Markdown over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: Client,
}

impl HttpSource {
    /// Fails only if the HTTP client cannot be set up (e.g. no TLS backend).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, path: &str) -> FetchResult {
        if DocumentKind::from_path(path) == DocumentKind::Pdf {
            return Ok(FetchedContent::Pdf);
        }

        let url = raw_url(&self.base_url, path);
        tracing::debug!(%url, "fetching document");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Transport {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| FetchError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        // Strict decoding: corrupt bytes are an error, not replacement characters
        let text = String::from_utf8(bytes.to_vec()).map_err(|e| FetchError::Body {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        Ok(FetchedContent::Markdown(text))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Offline stand-in that synthesizes filler text from the file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSource;

impl DocumentSource for PlaceholderSource {
    fn fetch(&self, path: &str) -> FetchResult {
        if DocumentKind::from_path(path) == DocumentKind::Pdf {
            return Ok(FetchedContent::Pdf);
        }
        Ok(FetchedContent::Markdown(placeholder_markdown(path)))
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

/// Filler document used by [`PlaceholderSource`].
pub fn placeholder_markdown(path: &str) -> String {
    let stem = file_name(path).trim_end_matches(".md");
    format!(
        "# {stem}\n\nThis is a placeholder for the content of {path}. \
         Run without `--offline` to fetch the actual document from the server."
    )
}

/// Markdown shown in place of a document that could not be fetched.
pub fn failure_message(path: &str) -> String {
    format!("# Document failed to load\n\nCould not load `{path}` from the document host.")
}

/// Direct URL of a document on the file host.
pub fn raw_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// URL of the external viewer pointed at a document.
pub fn viewer_url(base_url: &str, path: &str) -> String {
    format!(
        "{}?url={}&embedded=true",
        PDF_VIEWER_URL,
        raw_url(base_url, path)
    )
}
