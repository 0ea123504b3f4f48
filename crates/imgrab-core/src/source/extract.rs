//! Pulls media URLs out of search result pages.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;

/// Media URL field as it appears HTML-escaped in result page metadata.
static MEDIA_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"murl&quot;:&quot;(.*?)&quot;").expect("valid media url pattern"));

/// All media URLs in `body`, in page order, each query-unescaped.
/// Entries that fail to decode are dropped.
pub fn extract_candidates(body: &str) -> Vec<String> {
    MEDIA_URL_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| {
            let decoded = query_unescape(m.as_str());
            if decoded.is_none() {
                tracing::debug!("dropping undecodable candidate {:?}", m.as_str());
            }
            decoded
        })
        .collect()
}

/// Query-string unescape: `+` becomes a space and `%XX` a byte.
///
/// Returns `None` for a `%` not followed by two hex digits, or if the result is not UTF-8.
pub fn query_unescape(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3)?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(|cow| cow.into_owned())
}
