//! Search, download, and rank images into the output directory.

use anyhow::{Context, Result};
use imgrab_core::config::ImgrabConfig;
use imgrab_core::fetch::CurlFetcher;
use imgrab_core::harvest::{self, HarvestOptions};
use imgrab_core::source::{SearchQuery, SearchSource};

use crate::cli::Cli;

pub fn run_harvest(cfg: &ImgrabConfig, cli: &Cli) -> Result<()> {
    let query = SearchQuery::from_words(&cli.query, !cli.no_safe_search);
    tracing::info!(safe_search = query.safe_search, "query: {}", query.text);

    let mut source = SearchSource::new(cfg.http.clone(), cfg.search.clone(), query)
        .context("failed to build search request")?;
    let fetcher = CurlFetcher::new(cfg.http.clone());
    let opts = HarvestOptions::from_config(cfg, cli.count, &cli.outdir);

    let report = harvest::harvest(&opts, &mut source, &fetcher)?;

    println!(
        "saved {} of {} image(s) to {} ({} failed, {} over budget)",
        report.promoted,
        report.requested,
        cli.outdir.display(),
        report.failed,
        report.unslotted
    );
    Ok(())
}
