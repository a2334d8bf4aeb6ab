//! Static row partitioning and ring topology.
//!
//! The global `n × n` grid is split into horizontal stripes. Worker `r` of
//! `p` owns `n / p` rows, plus one extra row if `r < n % p`, so the
//! remainder is spread over the first workers and no two stripes differ by
//! more than one row. Stripes are contiguous and in worker order.
//!
//! When `p > n` the trailing workers own nothing. They are *degenerate*:
//! they take no part in the ring, and the ring is closed over the
//! [`active_workers`] alone.

use std::ops::Range;

use crate::error::PartitionError;
use crate::id::WorkerId;

/// The two ring neighbours of an active worker.
///
/// `up` owns the row immediately above this worker's first row, `down` the
/// row immediately below its last row, both with periodic wrap. In a ring
/// of one, both are the worker itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ring {
    /// Neighbour owning the row above.
    pub up: WorkerId,
    /// Neighbour owning the row below.
    pub down: WorkerId,
}

impl Ring {
    /// Neighbours of `worker` in a ring of `size` members.
    ///
    /// # Panics
    ///
    /// Panics if `size == 0` or `worker` is not below `size`.
    pub fn of(worker: WorkerId, size: usize) -> Self {
        assert!(
            worker.index() < size,
            "worker {worker} is outside a ring of {size}"
        );
        let r = worker.index();
        Self {
            up: WorkerId((r + size - 1) % size),
            down: WorkerId((r + 1) % size),
        }
    }
}

/// One worker's share of the global grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    /// Worker that owns this partition.
    pub worker: WorkerId,
    /// Total number of workers in the group.
    pub workers: usize,
    /// Number of owned rows, excluding halo rows.
    pub local_rows: usize,
    /// Global index of the first owned row.
    pub row_offset: usize,
}

impl Partition {
    /// Whether this worker owns no rows.
    pub fn is_degenerate(&self) -> bool {
        self.local_rows == 0
    }

    /// Global rows owned by this worker.
    pub fn global_rows(&self) -> Range<usize> {
        self.row_offset..self.row_offset + self.local_rows
    }

    /// Global row for a local row index, where local row 1 is the first
    /// owned row (row 0 is the top halo).
    pub fn global_row(&self, local_row: usize) -> usize {
        debug_assert!(
            (1..=self.local_rows).contains(&local_row),
            "local row {local_row} is not owned"
        );
        self.row_offset + (local_row - 1)
    }

    /// Ring neighbours, or `None` for a degenerate worker.
    ///
    /// `grid_size` must be the one this partition was computed from.
    pub fn ring(&self, grid_size: usize) -> Option<Ring> {
        if self.is_degenerate() {
            return None;
        }
        Some(Ring::of(self.worker, active_workers(grid_size, self.workers)))
    }
}

/// Number of workers that own at least one row.
pub fn active_workers(grid_size: usize, workers: usize) -> usize {
    grid_size.min(workers)
}

/// Compute the partition of a `grid_size`-row grid owned by `worker` out of
/// `workers`.
///
/// Pure: identical inputs always give identical output.
pub fn compute_partition(
    grid_size: usize,
    workers: usize,
    worker: WorkerId,
) -> Result<Partition, PartitionError> {
    if workers == 0 {
        return Err(PartitionError::NoWorkers);
    }
    let r = worker.index();
    if r >= workers {
        return Err(PartitionError::WorkerOutOfRange {
            worker: r,
            workers,
        });
    }

    let base = grid_size / workers;
    let rem = grid_size % workers;
    Ok(Partition {
        worker,
        workers,
        local_rows: base + usize::from(r < rem),
        row_offset: base * r + r.min(rem),
    })
}

/// Partitions of every worker in the group, in worker order.
pub fn partition_all(grid_size: usize, workers: usize) -> Result<Vec<Partition>, PartitionError> {
    (0..workers)
        .map(|r| compute_partition(grid_size, workers, WorkerId(r)))
        .collect()
}
