//! Per-candidate fetch: GET, validate, classify, name, and stream into the temporary area.
//!
//! The worker pool only sees the [`Fetch`] trait; [`CurlFetcher`] is the libcurl-backed
//! implementation used by the CLI.

mod classify;
mod easy;
mod name;

pub use classify::{classify_content_type, ImageKind};
pub use easy::CurlFetcher;
pub use name::{temp_file_name, url_digest};

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A candidate that has been fully copied into the temporary area and awaits a slot.
#[derive(Debug, Clone)]
pub struct Download {
    pub url: String,
    pub kind: ImageKind,
    /// `<digest><ext>`; suffix of the final name.
    pub file_name: String,
    /// Unique to this fetch, even when the same URL is being downloaded elsewhere.
    pub temp_path: PathBuf,
    pub bytes: u64,
}

/// Why a single candidate was abandoned. Never fatal to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] curl::Error),
    #[error("HTTP {0}")]
    Status(u32),
    #[error("not an image: {0:?}")]
    NotImage(String),
    #[error("write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Downloads one candidate into `temp_dir`.
///
/// On `Ok`, the returned [`Download::temp_path`] holds the complete body. On `Err`, nothing is
/// left behind in `temp_dir` for this candidate.
pub trait Fetch: Sync {
    fn fetch(&self, url: &str, temp_dir: &Path) -> Result<Download, FetchError>;
}
