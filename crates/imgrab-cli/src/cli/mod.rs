//! CLI for the imgrab image harvester.

mod commands;

use anyhow::Result;
use clap::Parser;
use imgrab_core::config;
use std::path::PathBuf;

use commands::run_harvest;

/// Download the first N images an image search returns for a query.
#[derive(Debug, Parser)]
#[command(name = "imgrab")]
#[command(about = "imgrab: harvest images matching a search query", long_about = None)]
pub struct Cli {
    /// Search query; words are joined with spaces.
    #[arg(required = true, value_name = "QUERY")]
    pub query: Vec<String>,

    /// Number of images to save.
    #[arg(short = 'n', long, default_value_t = 100, value_name = "N")]
    pub count: u32,

    /// Output directory (created if missing).
    #[arg(short = 'o', long, default_value = ".", value_name = "DIR")]
    pub outdir: PathBuf,

    /// Ask the search backend to turn safe search off.
    #[arg(long)]
    pub no_safe_search: bool,

    /// Number of download workers (overrides config).
    #[arg(short = 'w', long, value_name = "W")]
    pub workers: Option<usize>,

    /// Capacity of the candidate queue (overrides config).
    #[arg(long = "queue", value_name = "CAP")]
    pub queue_capacity: Option<usize>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        if let Some(workers) = cli.workers {
            cfg.workers = workers;
        }
        if let Some(cap) = cli.queue_capacity {
            cfg.queue_capacity = cap;
        }
        tracing::debug!("loaded config: {:?}", cfg);

        run_harvest(&cfg, &cli)
    }
}
