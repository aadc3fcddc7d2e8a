//! Display state and background search dispatch.
//!
//! Each [`Controller::submit`] spawns one thread that runs the fetch and sends a
//! [`Completion`] back over a channel. Only the owner of the controller drains that
//! channel ([`Controller::poll`] / [`Controller::wait`]), so the result list is only
//! ever written from the owner's thread.
//!
//! Overlapping searches are resolved last-writer-wins: every submit bumps a
//! generation counter and completions from older generations are dropped.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tweet_search_api::{Fetcher, SearchQuery, SearchResponse};

/// Result of one background search, sent back to the controller's owner
#[derive(Debug, Clone)]
pub struct Completion {
    pub generation: u64,
    pub query: SearchQuery,
    pub response: SearchResponse,
    pub elapsed: Duration,
}

pub struct Controller {
    fetcher: Arc<dyn Fetcher>,
    /// Lines currently displayed
    results: Vec<String>,
    busy: bool,
    busy_since: Option<Instant>,
    /// Generation of the most recent submit
    generation: u64,
    last_query: Option<SearchQuery>,
    last_elapsed: Option<Duration>,
    last_was_error: bool,
    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
}

impl Controller {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<Completion>();
        Self {
            fetcher,
            results: Vec::new(),
            busy: false,
            busy_since: None,
            generation: 0,
            last_query: None,
            last_elapsed: None,
            last_was_error: false,
            completion_tx,
            completion_rx,
        }
    }

    /// Start a search for `raw_input`.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the controller is busy
    /// by the time this returns, and the generation of the new search is returned.
    pub fn submit(&mut self, raw_input: &str) -> Option<u64> {
        let query = SearchQuery::parse(raw_input)?;

        self.generation += 1;
        let generation = self.generation;
        self.busy = true;
        self.busy_since = Some(Instant::now());
        self.last_query = Some(query.clone());

        log::debug!("Starting search #{} for {:?}", generation, query.text());

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.completion_tx.clone();
        thread::spawn(move || {
            let start = Instant::now();
            // A panicking fetcher still has to clear busy, so it completes as an error line.
            let response = panic::catch_unwind(AssertUnwindSafe(|| fetcher.search(&query)))
                .unwrap_or_else(|_| {
                    log::error!("Search #{} for {:?} panicked", generation, query.text());
                    SearchResponse::Error("search failed unexpectedly".to_string())
                });
            let _ = tx.send(Completion {
                generation,
                query,
                response,
                elapsed: start.elapsed(),
            });
        });

        Some(generation)
    }

    /// Replace the displayed results wholesale and clear the busy flag.
    pub fn on_fetch_complete(&mut self, lines: Vec<String>) {
        self.results = lines;
        self.busy = false;
        self.busy_since = None;
    }

    /// Apply pending completions without blocking. Returns true if the results changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.completion_rx.try_recv() {
            changed |= self.accept(completion);
        }
        changed
    }

    /// Block until the latest search completes or `timeout` elapses.
    ///
    /// Returns true if a completion was applied. Returns false immediately when
    /// nothing is in flight.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.busy {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.completion_rx.recv_timeout(remaining) {
                Ok(completion) => {
                    if self.accept(completion) {
                        return true;
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false;
                }
            }
        }
        false
    }

    fn accept(&mut self, completion: Completion) -> bool {
        if completion.generation != self.generation {
            log::debug!(
                "Dropping stale result of search #{} (latest is #{})",
                completion.generation,
                self.generation
            );
            return false;
        }

        log::debug!(
            "Search #{} for {:?} finished in {:?}",
            completion.generation,
            completion.query.text(),
            completion.elapsed
        );
        self.last_elapsed = Some(completion.elapsed);
        self.last_was_error = completion.response.is_error();
        self.on_fetch_complete(completion.response.into_lines());
        true
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// When the in-flight search started, if any
    pub fn busy_since(&self) -> Option<Instant> {
        self.busy_since
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_query(&self) -> Option<&SearchQuery> {
        self.last_query.as_ref()
    }

    pub fn last_elapsed(&self) -> Option<Duration> {
        self.last_elapsed
    }

    /// Whether the displayed lines are a single folded error message
    pub fn last_was_error(&self) -> bool {
        self.last_was_error
    }
}
