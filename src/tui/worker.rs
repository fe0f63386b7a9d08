//! Background document fetching.
//!
//! Every fetch runs on its own short-lived thread and reports back over a
//! channel, so a slow host never blocks drawing or input. The event loop drains
//! the channel between polls; the session decides whether a result is still
//! wanted.

use crate::fetch::{DocumentSource, FetchError, FetchResult};
use crate::session::FetchTicket;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

/// A finished fetch and the ticket it was issued for.
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: FetchResult,
}

/// Dispatches fetches to worker threads.
pub struct FetchWorker {
    source: Arc<dyn DocumentSource>,
    sender: Sender<FetchOutcome>,
    receiver: Receiver<FetchOutcome>,
}

impl FetchWorker {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source,
            sender,
            receiver,
        }
    }

    /// Short name of the underlying source (for the status bar).
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Start fetching `ticket.path` in the background.
    pub fn dispatch(&self, ticket: FetchTicket) {
        tracing::debug!(
            seq = ticket.seq,
            path = %ticket.path,
            source = self.source.name(),
            "fetch dispatched"
        );

        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        let job_ticket = ticket.clone();

        let spawned = thread::Builder::new()
            .name(format!("fetch-{}", ticket.seq))
            .spawn(move || {
                let result = source.fetch(&job_ticket.path);
                // The receiver is gone only when the app is shutting down
                let _ = sender.send(FetchOutcome {
                    ticket: job_ticket,
                    result,
                });
            });

        if let Err(e) = spawned {
            tracing::warn!(error = %e, "could not spawn fetch thread");
            let _ = self.sender.send(FetchOutcome {
                result: Err(FetchError::Transport {
                    path: ticket.path.clone(),
                    message: e.to_string(),
                }),
                ticket,
            });
        }
    }

    /// Take every outcome that has arrived since the last call. Never blocks.
    pub fn drain(&self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(outcome) => outcomes.push(outcome),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        outcomes
    }

    /// Block until the next outcome arrives or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Option<FetchOutcome> {
        self.receiver.recv_timeout(timeout).ok()
    }
}
