//! Per-candidate pipeline run by each pool thread.

use crossbeam::channel::Receiver;
use std::path::Path;

use super::report::Counters;
use super::slots::SlotAllocator;
use crate::fetch::{Download, Fetch};
use crate::storage;

/// Everything a worker borrows from the run.
pub(super) struct WorkerCtx<'a, F: ?Sized> {
    pub(super) fetcher: &'a F,
    pub(super) slots: &'a SlotAllocator,
    pub(super) temp_dir: &'a Path,
    pub(super) out_dir: &'a Path,
    pub(super) counters: &'a Counters,
}

/// Drains `queue` until it is closed and empty.
pub(super) fn run_worker<F>(id: usize, queue: Receiver<String>, ctx: &WorkerCtx<'_, F>)
where
    F: Fetch + ?Sized,
{
    for url in queue.iter() {
        // Queued before the budget ran out; not worth a fetch any more.
        if ctx.slots.is_exhausted() {
            ctx.counters.skipped();
            continue;
        }
        process(id, &url, ctx);
    }
    tracing::debug!(worker = id, "queue closed, worker exiting");
}

fn process<F>(id: usize, url: &str, ctx: &WorkerCtx<'_, F>)
where
    F: Fetch + ?Sized,
{
    tracing::info!(worker = id, "download: {}", url);
    let download = match ctx.fetcher.fetch(url, ctx.temp_dir) {
        Ok(download) => download,
        Err(e) => {
            tracing::warn!(worker = id, "download failed: {}: {}", url, e);
            ctx.counters.failed();
            return;
        }
    };

    let claimed = ctx.slots.claim(|rank| {
        let dest = storage::final_path(ctx.out_dir, rank, &download.file_name);
        storage::promote(&download.temp_path, &dest).map(|()| dest)
    });

    match claimed {
        Some((rank, Ok(dest))) => {
            tracing::info!(worker = id, rank, bytes = download.bytes, "saved {}", dest.display());
            ctx.counters.promoted(dest);
        }
        Some((rank, Err(e))) => {
            tracing::warn!(worker = id, rank, "promote failed: {}: {}", url, e);
            ctx.counters.failed();
            discard(&download);
        }
        None => {
            tracing::debug!(worker = id, "no slot left for {}", url);
            ctx.counters.unslotted();
            discard(&download);
        }
    }
}

/// Best-effort removal; whatever survives goes with the temp area.
fn discard(download: &Download) {
    if let Err(e) = std::fs::remove_file(&download.temp_path) {
        tracing::debug!("discard {}: {}", download.temp_path.display(), e);
    }
}
