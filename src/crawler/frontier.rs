//! Crawl frontier: which URLs are pending, done, or rejected
//!
//! The queue is a set, not a FIFO. [`Frontier::next`] hands out an arbitrary
//! member, so traversal order is unspecified and callers must not rely on it.

use std::collections::HashSet;

/// The visited / queued / skipped sets for one run
///
/// Invariants:
/// - `visited` and `queue` never share a URL
/// - a URL is queued only if it is neither visited nor already queued
/// - `visited` only grows for the lifetime of the frontier
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    queue: HashSet<String>,
    skipped: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed URL
    pub fn seeded(seed: impl Into<String>) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(seed);
        frontier
    }

    /// Takes any queued URL and marks it visited in one step
    pub fn next(&mut self) -> Option<String> {
        let url = self.queue.iter().next().cloned()?;
        self.queue.remove(&url);
        self.visited.insert(url.clone());
        Some(url)
    }

    /// True if the URL was already visited or is waiting in the queue
    pub fn is_known(&self, url: &str) -> bool {
        self.visited.contains(url) || self.queue.contains(url)
    }

    /// Queues a URL unless it is already known; returns whether it was added
    pub fn enqueue(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.is_known(&url) {
            return false;
        }
        self.queue.insert(url)
    }

    /// Records a URL rejected by the filter policy; returns whether it was new
    pub fn skip(&mut self, url: impl Into<String>) -> bool {
        self.skipped.insert(url.into())
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn queued(&self) -> &HashSet<String> {
        &self.queue
    }

    pub fn skipped(&self) -> &HashSet<String> {
        &self.skipped
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Visited plus queued: every URL the run knows it has to process
    pub fn known_count(&self) -> usize {
        self.visited.len() + self.queue.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    /// Checks the set invariants; used by tests and debug assertions
    pub fn is_consistent(&self) -> bool {
        self.visited.is_disjoint(&self.queue) && self.visited.is_disjoint(&self.skipped)
    }
}

/// Progress through the frontier as `(percent, done, total)`
///
/// `percent` is `floor(done * 100 / total)`; an empty frontier reports 0%.
pub fn progress_of(frontier: &Frontier) -> (u8, usize, usize) {
    let done = frontier.visited_count();
    let total = frontier.known_count();
    (percent(done, total), done, total)
}

/// Integer percentage, floored and clamped to 100
pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (done.saturating_mul(100) / total).min(100) as u8
}
