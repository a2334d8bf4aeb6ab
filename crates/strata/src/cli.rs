//! Command-line interface of the `strata` binary.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use strata_engine::{DirectorySink, GroupOptions, NoSnapshots};

/// Run a row-partitioned Game of Life on a group of worker threads.
#[derive(Debug, Parser)]
#[command(name = "strata", version, about)]
pub struct Cli {
    /// TOML configuration file.
    pub config: PathBuf,

    /// Number of workers.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub workers: u32,

    /// Directory for snapshot files.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Do not write snapshot files.
    #[arg(long)]
    pub no_snapshots: bool,
}

impl Cli {
    /// Group options for this invocation. Statistics are always printed.
    ///
    /// Creates the output directory unless snapshots are disabled.
    pub fn group_options(&self) -> io::Result<GroupOptions> {
        let options = GroupOptions::new(self.workers as usize).printing_stats(true);
        if self.no_snapshots {
            return Ok(options.with_sink(Arc::new(NoSnapshots)));
        }
        let sink = DirectorySink::create(&self.output_dir)?;
        Ok(options.with_sink(Arc::new(sink)))
    }
}
