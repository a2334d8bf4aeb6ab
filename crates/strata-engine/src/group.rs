//! Run a whole worker group in one process.
//!
//! [`run_group`] creates an in-process channel group, spawns one named
//! thread per worker, and joins them all. Every worker owns its endpoint
//! and its buffers; the only things the threads share are the read-only
//! configuration and the snapshot sink.

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{error, info};

use strata_comm::{channel_group, Communicator};
use strata_core::{PartitionError, SimulationConfig, WorkerId};
use strata_grid::Cell;

use crate::diagnostics::GenerationStats;
use crate::error::{GroupError, WorkerError};
use crate::snapshot::{DirectorySink, NoSnapshots, SnapshotSink};
use crate::worker::{run_worker, WorkerOutcome};

// ── Options ────────────────────────────────────────────────────────

/// How to run a group.
#[derive(Clone, Debug)]
pub struct GroupOptions {
    /// Number of workers. Default: 1.
    pub workers: usize,
    /// Where snapshots go. Default: discarded.
    pub snapshots: Arc<dyn SnapshotSink>,
    /// Print the coordinator's statistics lines on stdout. Default: false.
    pub print_stats: bool,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            snapshots: Arc::new(NoSnapshots),
            print_stats: false,
        }
    }
}

impl GroupOptions {
    /// Defaults with `workers` workers.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    /// Write snapshot files into `dir`.
    pub fn with_snapshot_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.with_sink(Arc::new(DirectorySink::new(dir)))
    }

    /// Send snapshots to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn SnapshotSink>) -> Self {
        self.snapshots = sink;
        self
    }

    /// Print statistics lines on stdout.
    pub fn printing_stats(mut self, print: bool) -> Self {
        self.print_stats = print;
        self
    }
}

// ── Report ─────────────────────────────────────────────────────────

/// Everything a successful group run produced.
#[derive(Clone, Debug)]
pub struct GroupReport {
    config: Arc<SimulationConfig>,
    outcomes: Vec<WorkerOutcome>,
    elapsed: Duration,
}

impl GroupReport {
    /// Configuration the group ran with.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Every worker's outcome, in worker order.
    pub fn outcomes(&self) -> &[WorkerOutcome] {
        &self.outcomes
    }

    /// Wall-clock time of the whole run.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Workers that owned no rows.
    pub fn degenerate_workers(&self) -> Vec<WorkerId> {
        self.outcomes
            .iter()
            .filter(|o| o.report().is_none())
            .map(WorkerOutcome::worker)
            .collect()
    }

    /// The coordinator's statistics, one per sampled generation.
    pub fn stats(&self) -> &[GenerationStats] {
        self.outcomes
            .first()
            .and_then(WorkerOutcome::report)
            .map(|r| r.stats.as_slice())
            .unwrap_or_default()
    }

    /// The final global grid, row-major, stitched from every worker's
    /// owned rows.
    pub fn assemble_grid(&self) -> Vec<Cell> {
        let n = self.config.grid_size;
        let mut cells = Vec::with_capacity(n * n);
        for report in self.outcomes.iter().filter_map(WorkerOutcome::report) {
            debug_assert_eq!(report.partition.row_offset * n, cells.len());
            cells.extend_from_slice(&report.cells);
        }
        cells
    }
}

// ── Runner ─────────────────────────────────────────────────────────

/// Run `config` on a group of `options.workers` worker threads.
///
/// Blocks until every worker has finished. If any worker fails, the group
/// is aborted and the most telling failure is returned: the first, in
/// worker order, that is not just the echo of another worker's abort.
pub fn run_group(
    config: SimulationConfig,
    options: GroupOptions,
) -> Result<GroupReport, GroupError> {
    config.validate()?;
    if options.workers == 0 {
        return Err(PartitionError::NoWorkers.into());
    }

    let config = Arc::new(config);
    info!(
        grid_size = config.grid_size,
        workers = options.workers,
        generations = config.generations,
        pattern = %config.pattern,
        "starting worker group"
    );
    let start = Instant::now();

    let mut handles: Vec<(WorkerId, JoinHandle<Result<WorkerOutcome, WorkerError>>)> =
        Vec::with_capacity(options.workers);
    let mut spawn_error = None;
    for comm in channel_group(options.workers) {
        let worker = comm.rank();
        let config = Arc::clone(&config);
        let sink = Arc::clone(&options.snapshots);
        let print_stats = options.print_stats;
        let spawned = thread::Builder::new()
            .name(format!("strata-worker-{}", worker.index()))
            .spawn(move || run_worker(&config, comm, sink.as_ref(), print_stats));
        match spawned {
            Ok(handle) => handles.push((worker, handle)),
            Err(e) => {
                // The endpoint went down with the closure, which aborts
                // the workers already running.
                spawn_error = Some(GroupError::ThreadSpawnFailed {
                    worker,
                    reason: e.to_string(),
                });
                break;
            }
        }
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    let mut failures = Vec::new();
    for (worker, handle) in handles {
        match handle.join() {
            Ok(Ok(outcome)) => outcomes.push(outcome),
            Ok(Err(source)) => failures.push(GroupError::Worker { worker, source }),
            Err(payload) => failures.push(GroupError::WorkerPanicked {
                worker,
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    if let Some(e) = spawn_error {
        error!(error = %e, "worker group did not start");
        return Err(e);
    }
    if let Some(e) = primary_failure(failures) {
        error!(error = %e, "worker group failed");
        return Err(e);
    }

    let report = GroupReport {
        config,
        outcomes,
        elapsed: start.elapsed(),
    };
    info!(
        elapsed_ms = report.elapsed.as_millis() as u64,
        degenerate = report.degenerate_workers().len(),
        "worker group finished"
    );
    Ok(report)
}

/// The first failure that is not an abort echo, else the first failure.
fn primary_failure(failures: Vec<GroupError>) -> Option<GroupError> {
    let pos = failures
        .iter()
        .position(|e| !e.is_secondary())
        .unwrap_or(0);
    failures.into_iter().nth(pos)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
