//! `strata`: run a row-partitioned Game of Life from a TOML config.
//!
//! **Usage:**
//! ```text
//! strata <config.toml> [--workers N] [--output-dir DIR] [--no-snapshots]
//! ```
//!
//! The coordinator prints `Iteration {step}. Live cells {count}` on stdout
//! for every sampled generation. Logging goes to stderr and is filtered by
//! `RUST_LOG` (default `info`). Exits 2 on a usage error and 1 if the run
//! fails.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use strata::cli::Cli;
use strata::prelude::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = SimulationConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let options = cli
        .group_options()
        .with_context(|| format!("creating {}", cli.output_dir.display()))?;

    let report = run_group(config, options).context("simulation failed")?;
    tracing::info!(
        grid_size = report.config().grid_size,
        generations = report.config().generations,
        elapsed_ms = report.elapsed().as_millis() as u64,
        live_cells = report.stats().last().map(|s| s.live_cells),
        "done"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .init();
}
