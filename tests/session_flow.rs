//! End-to-end flows through the session, the fetch worker and the renderers,
//! driven by a recording document source.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use studydash::catalog::Catalog;
use studydash::fetch::{FetchError, FetchResult, failure_message};
use studydash::markdown::html;
use studydash::session::FetchCommit;
use studydash::tui::worker::FetchWorker;
use studydash::view::{self, ContentView};
use studydash::{DocumentSource, FetchedContent, SessionState};

/// Serves canned documents and records every path it was asked for.
#[derive(Default)]
struct RecordingSource {
    documents: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl RecordingSource {
    fn with(documents: &[(&str, &str)]) -> Self {
        Self {
            documents: documents
                .iter()
                .map(|(path, body)| (path.to_string(), body.to_string()))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl DocumentSource for RecordingSource {
    fn fetch(&self, path: &str) -> FetchResult {
        self.requests.lock().unwrap().push(path.to_string());
        match self.documents.get(path) {
            Some(body) => Ok(FetchedContent::Markdown(body.clone())),
            None => Err(FetchError::Status {
                path: path.to_string(),
                status: 404,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Select `path` and run its fetch synchronously, as the event loop would.
fn open(state: &mut SessionState, catalog: &Catalog, source: &dyn DocumentSource, path: &str) {
    let entry = catalog.find(path).unwrap();
    if let Some(ticket) = state.select_document(entry) {
        let result = source.fetch(&ticket.path);
        assert_ne!(state.complete_fetch(&ticket, result), FetchCommit::Discarded);
    }
}

#[test]
fn markdown_selection_fetches_once_and_renders() {
    let catalog = Catalog::builtin();
    let source = RecordingSource::with(&[("AWS/EC2.md", "# EC2\nDetails")]);
    let mut state = SessionState::default();

    let ticket = state
        .select_document(catalog.find("AWS/EC2.md").unwrap())
        .unwrap();
    let result = source.fetch(&ticket.path);
    assert_eq!(state.complete_fetch(&ticket, result), FetchCommit::Applied);

    assert_eq!(source.requests(), vec!["AWS/EC2.md"]);
    assert_eq!(state.document_content(), "# EC2\nDetails");
    assert!(html::render(state.document_content()).contains("<h1>EC2</h1>"));
    assert_eq!(view::header_title(&state), "EC2");
}

#[test]
fn missing_document_shows_failure_message() {
    let catalog = Catalog::builtin();
    let source = RecordingSource::default();
    let mut state = SessionState::default();

    let ticket = state
        .select_document(catalog.find("GCP/GKE.md").unwrap())
        .unwrap();
    let result = source.fetch(&ticket.path);
    assert_eq!(state.complete_fetch(&ticket, result), FetchCommit::Failed);

    assert!(!state.is_loading());
    assert_eq!(state.document_content(), failure_message("GCP/GKE.md"));
    assert!(matches!(
        view::compose(&state, &catalog, "https://host"),
        ContentView::Markdown { .. }
    ));
}

#[test]
fn pdf_selection_never_fetches() {
    let catalog = Catalog::builtin();
    let source = RecordingSource::default();
    let mut state = SessionState::default();

    open(
        &mut state,
        &catalog,
        &source,
        "AWS/123/AWS_Implementation_QA.pdf",
    );

    assert!(source.requests().is_empty());
    assert!(state.is_pdf_active());
    assert_eq!(state.document_content(), "");
    assert!(matches!(
        view::compose(&state, &catalog, "https://host"),
        ContentView::Pdf { .. }
    ));
}

#[test]
fn home_keeps_content_and_reselect_fetches_again() {
    let catalog = Catalog::builtin();
    let source = RecordingSource::with(&[("AWS/S3.md", "# S3")]);
    let mut state = SessionState::default();

    open(&mut state, &catalog, &source, "AWS/S3.md");
    state.go_home();
    assert_eq!(state.document_content(), "# S3");
    assert!(matches!(
        view::compose(&state, &catalog, "https://host"),
        ContentView::Welcome { .. }
    ));

    open(&mut state, &catalog, &source, "AWS/S3.md");
    assert_eq!(source.requests(), vec!["AWS/S3.md", "AWS/S3.md"]);
}

#[test]
fn stale_result_is_discarded_through_worker() {
    let catalog = Catalog::builtin();
    let source = Arc::new(RecordingSource::with(&[
        ("AWS/EC2.md", "# EC2"),
        ("AWS/IAM.md", "# IAM"),
    ]));
    let worker = FetchWorker::new(source.clone());
    let mut state = SessionState::default();

    let first = state
        .select_document(catalog.find("AWS/EC2.md").unwrap())
        .unwrap();
    let second = state
        .select_document(catalog.find("AWS/IAM.md").unwrap())
        .unwrap();
    worker.dispatch(first);
    worker.dispatch(second);

    let mut commits = Vec::new();
    for _ in 0..2 {
        let outcome = worker.wait(Duration::from_secs(5)).unwrap();
        let path = outcome.ticket.path.clone();
        commits.push((path, state.complete_fetch(&outcome.ticket, outcome.result)));
    }

    assert!(commits.contains(&("AWS/EC2.md".to_string(), FetchCommit::Discarded)));
    assert!(commits.contains(&("AWS/IAM.md".to_string(), FetchCommit::Applied)));
    assert_eq!(state.active_document(), Some("AWS/IAM.md"));
    assert_eq!(state.document_content(), "# IAM");
}

#[test]
fn search_narrows_groups() {
    let catalog = Catalog::builtin();
    let mut state = SessionState::default();
    state.set_search_query("s3".to_string());

    let filtered = catalog.filtered(state.search_query());
    let titles = |i: usize| filtered[i].1.iter().map(|e| e.title).collect::<Vec<_>>();
    assert_eq!(titles(0), vec!["S3"]);
    assert!(titles(1).is_empty());
}
