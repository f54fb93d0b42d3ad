//! Sliding-window statistics over search requests.
//!
//! [`RequestQueue`] wraps an engine and records, for every find request made
//! through it, whether the request returned anything. Time is measured in
//! ticks: each recorded request advances the clock by one tick, and requests
//! older than the window are forgotten.

use std::collections::VecDeque;

use crate::document::{DocumentId, DocumentStatus, ScoredDocument};
use crate::error::Result;
use crate::search::SearchEngine;

/// Default window length in ticks (one day of minutes).
pub const DEFAULT_WINDOW: u64 = 1440;

#[derive(Clone, Copy, Debug)]
struct RequestRecord {
    tick: u64,
    result_count: usize,
}

/// Records find requests and counts the ones that found nothing.
#[derive(Debug)]
pub struct RequestQueue<'a> {
    engine: &'a SearchEngine,
    requests: VecDeque<RequestRecord>,
    window: u64,
    no_result_requests: usize,
    current_tick: u64,
}

impl<'a> RequestQueue<'a> {
    /// Create a queue with the default window.
    pub fn new(engine: &'a SearchEngine) -> Self {
        Self::with_window(engine, DEFAULT_WINDOW)
    }

    /// Create a queue keeping the last `window` ticks.
    pub fn with_window(engine: &'a SearchEngine, window: u64) -> Self {
        RequestQueue {
            engine,
            requests: VecDeque::new(),
            window,
            no_result_requests: 0,
            current_tick: 0,
        }
    }

    /// Run a default find request and record it.
    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<ScoredDocument>> {
        let found = self.engine.find_top_documents(raw_query)?;
        self.record(found.len());
        Ok(found)
    }

    /// Run a find request restricted to `status` and record it.
    pub fn add_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<ScoredDocument>> {
        let found = self.engine.find_top_documents_by_status(raw_query, status)?;
        self.record(found.len());
        Ok(found)
    }

    /// Run a find request filtered by `predicate` and record it.
    pub fn add_find_request_by<P>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let found = self.engine.find_top_documents_by(raw_query, predicate)?;
        self.record(found.len());
        Ok(found)
    }

    /// Number of requests within the window that returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    /// Number of requests within the window.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn record(&mut self, result_count: usize) {
        self.current_tick += 1;
        while let Some(oldest) = self.requests.front() {
            if self.current_tick - oldest.tick < self.window {
                break;
            }
            if oldest.result_count == 0 {
                self.no_result_requests -= 1;
            }
            self.requests.pop_front();
        }

        self.requests.push_back(RequestRecord {
            tick: self.current_tick,
            result_count,
        });
        if result_count == 0 {
            self.no_result_requests += 1;
        }
    }
}
