//! One worker's run, from partition to shutdown barrier.
//!
//! A [`Worker`] owns everything it touches: its partition, both grid
//! buffers and its communicator endpoint. Nothing is shared with other
//! workers except what goes through the communicator.
//!
//! # Shutdown
//!
//! Every worker, active or degenerate, finishes at the same barrier and
//! then closes its endpoint. A worker that fails aborts the group instead,
//! so no peer is left waiting on a message that will never come.

use std::io::{self, Write};
use std::time::Instant;

use tracing::{debug, trace, warn};

use strata_comm::{barrier, exchange_halos, Communicator};
use strata_core::{
    active_workers, compute_partition, Partition, Ring, SimulationConfig, WorkerId,
};
use strata_grid::init::seed_pattern;
use strata_grid::{stencil, Cell, DoubleBuffer, GridBuffer};

use crate::diagnostics::{gather_stats, report_on_coordinator, should_sample, GenerationStats};
use crate::error::WorkerError;
use crate::metrics::{micros, StepMetrics};
use crate::snapshot::SnapshotSink;

// ── Outcome ────────────────────────────────────────────────────────

/// What a worker hands back when it finishes cleanly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// The worker owned no rows and only joined the shutdown barrier.
    Degenerate {
        /// The idle worker.
        worker: WorkerId,
    },
    /// The worker ran every generation.
    Completed(WorkerReport),
}

impl WorkerOutcome {
    /// The report of a worker that ran, if this one did.
    pub fn report(&self) -> Option<&WorkerReport> {
        match self {
            Self::Degenerate { .. } => None,
            Self::Completed(report) => Some(report),
        }
    }

    /// The worker this outcome belongs to.
    pub fn worker(&self) -> WorkerId {
        match self {
            Self::Degenerate { worker } => *worker,
            Self::Completed(report) => report.partition.worker,
        }
    }
}

/// Final state of an active worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    /// Rows this worker owned.
    pub partition: Partition,
    /// Owned rows after the last generation, row-major.
    pub cells: Vec<Cell>,
    /// Global statistics, one per sampled generation. Only the coordinator
    /// has any.
    pub stats: Vec<GenerationStats>,
    /// Phase timings summed over every generation.
    pub metrics: StepMetrics,
}

// ── Worker ─────────────────────────────────────────────────────────

/// An active worker: a partition with at least one row, its buffers and
/// its ring neighbours.
pub struct Worker<'a, C: Communicator> {
    config: &'a SimulationConfig,
    comm: &'a mut C,
    sink: &'a dyn SnapshotSink,
    print_stats: bool,
    partition: Partition,
    ring: Ring,
    active: usize,
    buffers: DoubleBuffer,
    stats: Vec<GenerationStats>,
    metrics: StepMetrics,
}

impl<'a, C: Communicator> Worker<'a, C> {
    /// Allocate and seed the buffers of a partition with ring neighbours
    /// `ring`.
    pub fn new(
        config: &'a SimulationConfig,
        partition: Partition,
        ring: Ring,
        comm: &'a mut C,
        sink: &'a dyn SnapshotSink,
        print_stats: bool,
    ) -> Self {
        debug_assert!(!partition.is_degenerate(), "degenerate worker has no buffers");
        let mut current = GridBuffer::new(partition.local_rows, config.grid_size);
        seed_pattern(&mut current, &partition, config);
        Self {
            config,
            comm,
            sink,
            print_stats,
            partition,
            ring,
            active: active_workers(config.grid_size, partition.workers),
            buffers: DoubleBuffer::from_current(current),
            stats: Vec::new(),
            metrics: StepMetrics::default(),
        }
    }

    /// The state at the current generation.
    pub fn current(&self) -> &GridBuffer {
        self.buffers.current()
    }

    /// Advance one generation.
    ///
    /// Exchange halos, compute the next state, then sample statistics and
    /// snapshot the *current* generation before swapping. Sampling here
    /// means generation 0 reports the initial pattern.
    pub fn step(&mut self, generation: u64) -> Result<StepMetrics, WorkerError> {
        let start = Instant::now();
        let mut m = StepMetrics::default();

        exchange_halos(
            &mut *self.comm,
            self.ring,
            generation,
            self.buffers.current_mut(),
        )?;
        m.exchange_us = micros(start.elapsed());

        let t = Instant::now();
        let (current, next) = self.buffers.split();
        stencil::step(current, next);
        m.compute_us = micros(t.elapsed());

        if should_sample(generation, self.config.stats_every) {
            let t = Instant::now();
            self.diagnose(generation)?;
            m.diagnose_us = micros(t.elapsed());
        }

        if should_sample(generation, self.config.data_every) {
            let t = Instant::now();
            self.sink.write(generation, &self.partition, self.buffers.current())?;
            m.snapshot_us = micros(t.elapsed());
        }

        self.buffers.swap();
        m.total_us = micros(start.elapsed());
        trace!(
            worker = %self.partition.worker,
            generation,
            exchange_us = m.exchange_us,
            compute_us = m.compute_us,
            diagnose_us = m.diagnose_us,
            snapshot_us = m.snapshot_us,
            total_us = m.total_us,
            local_us = m.local_us(),
            "generation done"
        );
        self.metrics += m;
        Ok(m)
    }

    fn diagnose(&mut self, generation: u64) -> Result<(), WorkerError> {
        let stats = gather_stats(
            &mut *self.comm,
            self.buffers.current(),
            generation,
            self.active,
        )?;
        if let Some(stats) = stats {
            if self.print_stats {
                let mut out = io::stdout().lock();
                report_on_coordinator(self.partition.worker, &stats, &mut out)
                    .and_then(|_| out.flush())
                    .map_err(WorkerError::Report)?;
            }
            self.stats.push(stats);
        }
        Ok(())
    }

    /// Run every configured generation.
    pub fn run(mut self) -> Result<WorkerReport, WorkerError> {
        for generation in 0..self.config.generations {
            self.step(generation)?;
        }
        Ok(WorkerReport {
            partition: self.partition,
            cells: self.buffers.current().owned_cells().to_vec(),
            stats: self.stats,
            metrics: self.metrics,
        })
    }
}

// ── Entry point ────────────────────────────────────────────────────

/// Run one worker to completion over `comm`.
///
/// On success the endpoint is closed cleanly; on failure the group is
/// aborted before the error is returned.
pub fn run_worker<C: Communicator>(
    config: &SimulationConfig,
    mut comm: C,
    sink: &dyn SnapshotSink,
    print_stats: bool,
) -> Result<WorkerOutcome, WorkerError> {
    match drive(config, &mut comm, sink, print_stats) {
        Ok(outcome) => {
            comm.close();
            Ok(outcome)
        }
        Err(e) => {
            warn!(worker = %comm.rank(), error = %e, "worker failed");
            comm.abort();
            Err(e)
        }
    }
}

fn drive<C: Communicator>(
    config: &SimulationConfig,
    comm: &mut C,
    sink: &dyn SnapshotSink,
    print_stats: bool,
) -> Result<WorkerOutcome, WorkerError> {
    let (rank, workers) = (comm.rank(), comm.size());
    let partition = compute_partition(config.grid_size, workers, rank)?;

    if rank.is_coordinator() && workers > config.grid_size {
        warn!(
            workers,
            grid_size = config.grid_size,
            "more workers than grid rows; some workers will own no rows"
        );
    }

    let Some(ring) = partition.ring(config.grid_size) else {
        warn!(
            worker = %rank,
            grid_size = config.grid_size,
            workers,
            "worker owns no rows, waiting for shutdown"
        );
        barrier(comm)?;
        return Ok(WorkerOutcome::Degenerate { worker: rank });
    };

    debug!(
        worker = %rank,
        local_rows = partition.local_rows,
        row_offset = partition.row_offset,
        up = %ring.up,
        down = %ring.down,
        "worker starting"
    );
    let report = Worker::new(config, partition, ring, &mut *comm, sink, print_stats).run()?;
    barrier(comm)?;
    debug!(worker = %rank, "worker finished");
    Ok(WorkerOutcome::Completed(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::NoSnapshots;
    use strata_comm::channel_group;
    use strata_core::InitialPattern;
    use strata_test_utils::{glider_grid, serial_step};

    fn glider(grid_size: usize, generations: u64) -> SimulationConfig {
        SimulationConfig {
            grid_size,
            generations,
            pattern: InitialPattern::Glider,
            ..SimulationConfig::default()
        }
    }

    fn solo(config: &SimulationConfig) -> WorkerReport {
        let comm = channel_group(1).pop().unwrap();
        match run_worker(config, comm, &NoSnapshots, false).unwrap() {
            WorkerOutcome::Completed(report) => report,
            other => panic!("expected a completed worker, got {other:?}"),
        }
    }

    #[test]
    fn single_worker_matches_serial_step() {
        let config = glider(4, 1);
        let report = solo(&config);
        assert_eq!(report.cells, serial_step(&glider_grid(4), 4));
    }

    #[test]
    fn stats_report_the_pre_update_state() {
        let config = SimulationConfig {
            stats_every: 2,
            ..glider(6, 5)
        };
        let report = solo(&config);
        let generations: Vec<u64> = report.stats.iter().map(|s| s.generation).collect();
        assert_eq!(generations, vec![0, 2, 4]);
        // A glider always has five live cells.
        assert!(report.stats.iter().all(|s| s.live_cells == 5));
    }

    #[test]
    fn step_returns_its_own_metrics() {
        let config = glider(5, 1);
        let mut group = channel_group(1);
        let partition = compute_partition(5, 1, WorkerId(0)).unwrap();
        let ring = partition.ring(5).unwrap();
        let mut worker = Worker::new(&config, partition, ring, &mut group[0], &NoSnapshots, false);
        let m = worker.step(0).unwrap();
        assert!(m.total_us >= m.exchange_us);
        assert_eq!(m.local_us(), m.total_us - m.exchange_us);
        assert_eq!(worker.current().live_count(), 5);
        drop(worker);
        group[0].close();
    }

    #[test]
    fn failure_aborts_the_group() {
        // A two-worker group where worker 1 never shows up: worker 0's
        // first exchange sees the abort from worker 1's dropped endpoint.
        let config = glider(4, 3);
        let mut group = channel_group(2);
        drop(group.pop());
        let comm = group.pop().unwrap();
        match run_worker(&config, comm, &NoSnapshots, false) {
            Err(e) => assert!(e.is_secondary(), "unexpected error {e}"),
            Ok(outcome) => panic!("expected an abort, got {outcome:?}"),
        }
    }
}
