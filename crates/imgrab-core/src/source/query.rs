//! Search page URL construction.

use url::Url;

use super::PageCursor;

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub safe_search: bool,
}

impl SearchQuery {
    /// Joins positional words with single spaces.
    pub fn from_words<I, S>(words: I, safe_search: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = words
            .into_iter()
            .map(|w| w.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Self { text, safe_search }
    }
}

/// Backend value of the `safesearch` parameter: empty keeps the backend default (on).
pub fn safe_search_value(enabled: bool) -> &'static str {
    if enabled {
        ""
    } else {
        "off"
    }
}

/// URL of the result page for `cursor`.
pub fn page_url(
    endpoint: &str,
    form: &str,
    query: &SearchQuery,
    cursor: &PageCursor,
) -> Result<Url, url::ParseError> {
    let count = cursor.wanted.max(0).to_string();
    let first = cursor.offset.to_string();
    Url::parse_with_params(
        endpoint,
        &[
            ("q", query.text.as_str()),
            ("count", count.as_str()),
            ("safesearch", safe_search_value(query.safe_search)),
            ("first", first.as_str()),
            ("FORM", form),
        ],
    )
}
