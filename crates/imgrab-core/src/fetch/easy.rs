//! libcurl-backed [`Fetch`]: one blocking GET per call, body streamed straight to the temp file.
//!
//! The response is validated when the first body chunk arrives (status and content type are
//! known by then), so rejected responses never touch the disk.

use std::cell::RefCell;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::classify::{classify_content_type, ImageKind};
use super::name::temp_file_name;
use super::{Download, Fetch, FetchError};
use crate::config::HttpConfig;
use crate::http::{self, ResponseHead};

/// Fetches candidates with a fresh `curl::easy::Easy` per request.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    http: HttpConfig,
}

impl CurlFetcher {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }
}

impl Fetch for CurlFetcher {
    fn fetch(&self, url: &str, temp_dir: &Path) -> Result<Download, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        http::configure(&mut easy, &self.http)?;

        let sink = RefCell::new(BodySink::new(url, temp_dir));
        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                sink.borrow_mut().head.push_raw(data);
                true
            })?;
            transfer.write_function(|data| {
                let mut sink = sink.borrow_mut();
                match sink.write(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        sink.failure = Some(e);
                        // Short count makes libcurl abort the transfer.
                        Ok(0)
                    }
                }
            })?;
            transfer.perform()
        };

        sink.into_inner().finish(performed)
    }
}

/// Private temp file of one fetch. Deleted on drop unless [`BodySink::finish`] keeps it.
struct TempOut {
    kind: ImageKind,
    file_name: String,
    writer: BufWriter<NamedTempFile>,
}

/// Collects the response head and owns the temp file once the response has been accepted.
struct BodySink<'a> {
    url: &'a str,
    temp_dir: &'a Path,
    head: ResponseHead,
    out: Option<TempOut>,
    bytes: u64,
    failure: Option<FetchError>,
}

impl<'a> BodySink<'a> {
    fn new(url: &'a str, temp_dir: &'a Path) -> Self {
        Self {
            url,
            temp_dir,
            head: ResponseHead::default(),
            out: None,
            bytes: 0,
            failure: None,
        }
    }

    /// Validates status and content type, then creates the temp file.
    ///
    /// The same URL can be in flight on several workers, so the file gets a unique
    /// `<digest><ext>.XXXXXX.part` name rather than the bare `file_name`.
    fn open(&mut self) -> Result<(), FetchError> {
        let status = self.head.status.unwrap_or(0);
        if status != 200 {
            return Err(FetchError::Status(status));
        }
        let content_type = self.head.content_type.clone().unwrap_or_default();
        let kind = classify_content_type(&content_type).ok_or(FetchError::NotImage(content_type))?;

        let file_name = temp_file_name(self.url, kind);
        let file = tempfile::Builder::new()
            .prefix(&format!("{}.", file_name))
            .suffix(".part")
            .tempfile_in(self.temp_dir)
            .map_err(|source| FetchError::Io {
                path: self.temp_dir.join(&file_name),
                source,
            })?;
        self.out = Some(TempOut {
            kind,
            file_name,
            writer: BufWriter::new(file),
        });
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), FetchError> {
        // Body of a redirect hop that libcurl is about to follow.
        if self.out.is_none() && matches!(self.head.status, Some(300..=399)) {
            return Ok(());
        }
        if self.out.is_none() {
            self.open()?;
        }
        if let Some(out) = self.out.as_mut() {
            out.writer.write_all(data).map_err(|source| FetchError::Io {
                path: out.writer.get_ref().path().to_path_buf(),
                source,
            })?;
        }
        self.bytes += data.len() as u64;
        Ok(())
    }

    /// On error any partial temp file is dropped with the sink, which deletes it.
    fn finish(mut self, performed: Result<(), curl::Error>) -> Result<Download, FetchError> {
        if let Some(e) = self.failure.take() {
            return Err(e);
        }
        performed?;
        // Empty body: the write callback never ran, so validate now.
        if self.out.is_none() {
            self.open()?;
        }
        let Some(TempOut {
            kind,
            file_name,
            writer,
        }) = self.out.take()
        else {
            return Err(FetchError::Status(self.head.status.unwrap_or(0)));
        };

        let path = writer.get_ref().path().to_path_buf();
        let io_err = |source| FetchError::Io {
            path: path.clone(),
            source,
        };
        let file = writer.into_inner().map_err(|e| io_err(e.into_error()))?;
        let (_, temp_path) = file.keep().map_err(|e| io_err(e.error))?;
        Ok(Download {
            url: self.url.to_string(),
            kind,
            file_name,
            temp_path,
            bytes: self.bytes,
        })
    }
}
