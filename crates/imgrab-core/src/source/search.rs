//! Image search backend pager.

use url::Url;

use super::extract::extract_candidates;
use super::query::{page_url, SearchQuery};
use super::{CandidateSource, PageCursor, SourceError};
use crate::config::{HttpConfig, SearchConfig};
use crate::http::{self, ResponseHead};

/// Requests result pages from the configured search endpoint and extracts media URLs.
#[derive(Debug, Clone)]
pub struct SearchSource {
    http: HttpConfig,
    search: SearchConfig,
    query: SearchQuery,
}

impl SearchSource {
    /// Fails if the endpoint cannot produce a valid request URL.
    pub fn new(
        http: HttpConfig,
        search: SearchConfig,
        query: SearchQuery,
    ) -> Result<Self, SourceError> {
        page_url(&search.endpoint, &search.form, &query, &PageCursor::default())?;
        Ok(Self {
            http,
            search,
            query,
        })
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    fn get_page(&self, url: &Url) -> Result<String, SourceError> {
        let mut body = Vec::new();
        let mut head = ResponseHead::default();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        http::configure(&mut easy, &self.http)?;
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                head.push_raw(data);
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(SourceError::Status(code));
        }
        tracing::debug!(
            bytes = body.len(),
            content_type = head.content_type.as_deref().unwrap_or(""),
            "search page fetched"
        );
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl CandidateSource for SearchSource {
    fn next_batch(&mut self, cursor: &PageCursor) -> Result<Option<Vec<String>>, SourceError> {
        let url = page_url(&self.search.endpoint, &self.search.form, &self.query, cursor)?;
        tracing::info!("search page: {}", url);
        let body = self.get_page(&url)?;
        let candidates = extract_candidates(&body);
        tracing::info!(
            offset = cursor.offset,
            found = candidates.len(),
            "search page parsed"
        );
        if candidates.is_empty() {
            return Ok(None);
        }
        Ok(Some(candidates))
    }
}
