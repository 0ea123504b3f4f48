//! Run summary and the shared counters it is built from.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// What a finished run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Target number of files (N).
    pub requested: u32,
    /// Candidates handed to the worker queue.
    pub dispatched: u64,
    /// Queued candidates dropped without fetching because the budget was already spent.
    pub skipped: u64,
    /// Candidates fully copied into the temp area (one budget decrement each).
    pub downloaded: u64,
    /// Files written to the output directory.
    pub promoted: u64,
    /// Downloads that completed after every slot was taken.
    pub unslotted: u64,
    /// Per-item failures: fetch, validation, copy, or promotion.
    pub failed: u64,
    /// Final file paths, in rank order.
    pub files: Vec<PathBuf>,
    /// Temp area used by the run; removed before the report is returned.
    pub temp_dir: PathBuf,
}

#[derive(Debug, Default)]
pub(super) struct Counters {
    dispatched: AtomicU64,
    skipped: AtomicU64,
    unslotted: AtomicU64,
    failed: AtomicU64,
    files: Mutex<Vec<PathBuf>>,
}

impl Counters {
    pub(super) fn dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn unslotted(&self) {
        self.unslotted.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn promoted(&self, path: PathBuf) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path);
    }

    pub(super) fn into_report(
        self,
        requested: u32,
        downloaded: u64,
        temp_dir: PathBuf,
    ) -> HarvestReport {
        let mut files = self.files.into_inner().unwrap_or_else(PoisonError::into_inner);
        // Zero-padded rank prefix makes name order rank order.
        files.sort();
        HarvestReport {
            requested,
            dispatched: self.dispatched.into_inner(),
            skipped: self.skipped.into_inner(),
            downloaded,
            promoted: files.len() as u64,
            unslotted: self.unslotted.into_inner(),
            failed: self.failed.into_inner(),
            files,
            temp_dir,
        }
    }
}
