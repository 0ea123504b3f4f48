//! Shared libcurl request setup and response header tracking.

use crate::config::HttpConfig;
use std::time::Duration;

/// Applies redirects, timeouts, and the identifying headers from `cfg` to `easy`.
pub(crate) fn configure(easy: &mut curl::easy::Easy, cfg: &HttpConfig) -> Result<(), curl::Error> {
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs.max(1)))?;
    if let Some(secs) = cfg.transfer_timeout_secs {
        easy.timeout(Duration::from_secs(secs))?;
    }
    easy.useragent(&cfg.user_agent)?;

    let mut list = curl::easy::List::new();
    if !cfg.referer.trim().is_empty() {
        list.append(&format!("Referer: {}", cfg.referer.trim()))?;
    }
    easy.http_headers(list)?;
    Ok(())
}

/// Status and content type of the final response, built from header lines as libcurl reports them.
///
/// Each `HTTP/` status line starts a new response (one per redirect hop), so only the
/// headers of the last hop survive.
#[derive(Debug, Default, Clone)]
pub(crate) struct ResponseHead {
    pub(crate) status: Option<u32>,
    pub(crate) content_type: Option<String>,
}

impl ResponseHead {
    pub(crate) fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            *self = ResponseHead {
                status: line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|code| code.parse().ok()),
                content_type: None,
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-type") {
                self.content_type = Some(value.trim().to_string());
            }
        }
    }

    pub(crate) fn push_raw(&mut self, data: &[u8]) {
        if let Ok(s) = std::str::from_utf8(data) {
            self.push_line(s);
        }
    }
}
