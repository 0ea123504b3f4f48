//! Candidate sources: where image URLs come from.
//!
//! The harvest pipeline pulls pages of candidates through [`CandidateSource`] and can stop
//! pulling at any time. [`SearchSource`] pages through an HTTP image search backend;
//! [`VecSource`] serves a fixed list and keeps the pipeline testable without a network.

mod extract;
mod query;
mod search;

pub use extract::{extract_candidates, query_unescape};
pub use query::{page_url, safe_search_value, SearchQuery};
pub use search::SearchSource;

use thiserror::Error;

/// Pagination state the dispatcher accumulates and hands to the source on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    /// Number of candidates dispatched so far (the backend's "first" index).
    pub offset: u64,
    /// Budget remaining when the page is requested.
    pub wanted: i64,
}

/// Failure to obtain candidates. Fatal to the run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid search URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("search request failed: {0}")]
    Transport(#[from] curl::Error),
    #[error("search returned HTTP {0}")]
    Status(u32),
}

/// Lazy, possibly unbounded producer of candidate URLs.
pub trait CandidateSource {
    /// Next batch of candidates for `cursor`. `Ok(None)` (or an empty batch) means exhausted.
    fn next_batch(&mut self, cursor: &PageCursor) -> Result<Option<Vec<String>>, SourceError>;
}

/// Serves a fixed list of candidates in pages of `page_size`.
#[derive(Debug, Clone)]
pub struct VecSource {
    items: Vec<String>,
    page_size: usize,
    next: usize,
    cursors: Vec<PageCursor>,
}

impl VecSource {
    pub fn new<I, S>(items: I, page_size: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            page_size: page_size.max(1),
            next: 0,
            cursors: Vec::new(),
        }
    }

    /// Cursors received so far, one per `next_batch` call.
    pub fn cursors(&self) -> &[PageCursor] {
        &self.cursors
    }
}

impl CandidateSource for VecSource {
    fn next_batch(&mut self, cursor: &PageCursor) -> Result<Option<Vec<String>>, SourceError> {
        self.cursors.push(*cursor);
        if self.next >= self.items.len() {
            return Ok(None);
        }
        let end = (self.next + self.page_size).min(self.items.len());
        let page = self.items[self.next..end].to_vec();
        self.next = end;
        Ok(Some(page))
    }
}
