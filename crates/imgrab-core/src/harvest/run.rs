//! Orchestrates one harvest: directories, worker pool, dispatcher, shutdown.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::thread;

use super::dispatch::{dispatch, DispatchEnd};
use super::report::{Counters, HarvestReport};
use super::slots::SlotAllocator;
use super::worker::{run_worker, WorkerCtx};
use crate::config::ImgrabConfig;
use crate::fetch::Fetch;
use crate::source::{CandidateSource, SourceError};
use crate::storage::TempArea;

/// Parameters of a single run.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Number of files to keep (N).
    pub count: u32,
    /// Output directory; created (with parents) if missing.
    pub out_dir: PathBuf,
    pub workers: usize,
    pub queue_capacity: usize,
    /// Parent of the temp area. None = system temp dir.
    pub temp_root: Option<PathBuf>,
}

impl HarvestOptions {
    pub fn new(count: u32, out_dir: impl Into<PathBuf>) -> Self {
        let defaults = ImgrabConfig::default();
        Self {
            count,
            out_dir: out_dir.into(),
            workers: defaults.workers,
            queue_capacity: defaults.queue_capacity,
            temp_root: None,
        }
    }

    /// Pool size and queue capacity from `cfg`.
    pub fn from_config(cfg: &ImgrabConfig, count: u32, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            workers: cfg.workers,
            queue_capacity: cfg.queue_capacity,
            ..Self::new(count, out_dir)
        }
    }
}

/// Harvests up to `opts.count` images from `source` into `opts.out_dir`.
///
/// Per-candidate failures are logged and counted in the report. Errors are fatal: failing to
/// create the output or temp directory, failing to start the pool, or a source failure. The
/// temp area is gone by the time this returns, on every path.
pub fn harvest<S, F>(opts: &HarvestOptions, source: &mut S, fetcher: &F) -> Result<HarvestReport>
where
    S: CandidateSource + ?Sized,
    F: Fetch + ?Sized,
{
    fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("failed to create output dir {}", opts.out_dir.display()))?;
    let temp = TempArea::create(opts.temp_root.as_deref())?;

    let slots = SlotAllocator::new(opts.count);
    let counters = Counters::default();
    let workers = opts.workers.max(1);
    let (tx, rx) = crossbeam::channel::bounded::<String>(opts.queue_capacity.max(1));

    tracing::info!(
        count = opts.count,
        workers,
        queue = opts.queue_capacity.max(1),
        "harvest into {}",
        opts.out_dir.display()
    );

    let ctx = WorkerCtx {
        fetcher,
        slots: &slots,
        temp_dir: temp.path(),
        out_dir: &opts.out_dir,
        counters: &counters,
    };

    let outcome: Result<Result<DispatchEnd, SourceError>> = thread::scope(|scope| {
        for id in 0..workers {
            let queue = rx.clone();
            let ctx = &ctx;
            thread::Builder::new()
                .name(format!("imgrab-worker-{}", id))
                .spawn_scoped(scope, move || run_worker(id, queue, ctx))
                .context("failed to spawn worker")?;
        }

        let end = dispatch(source, &slots, tx, &counters);
        if end.is_err() {
            // Fatal: don't start on what is still queued, only finish what is in flight.
            while rx.try_recv().is_ok() {}
        }
        drop(rx);
        Ok(end)
    });

    let temp_dir = temp.path().to_path_buf();
    if let Err(e) = temp.close() {
        tracing::warn!("{:#}", e);
    }

    let end = outcome?.context("candidate source failed")?;
    let report = counters.into_report(opts.count, slots.claims(), temp_dir);
    tracing::info!(
        ?end,
        promoted = report.promoted,
        downloaded = report.downloaded,
        unslotted = report.unslotted,
        failed = report.failed,
        skipped = report.skipped,
        "harvest finished"
    );
    Ok(report)
}
