//! Live-cell statistics.
//!
//! Every sampled generation each active worker counts the live cells in its
//! owned rows, the counts are summed at the coordinator, and the
//! coordinator alone reports the total.

use std::fmt;
use std::io::{self, Write};

use strata_comm::{reduce_sum, CommError, Communicator};
use strata_core::WorkerId;
use strata_grid::GridBuffer;

/// Global live-cell count at one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationStats {
    /// Generation index the count was taken at.
    pub generation: u64,
    /// Live cells in the whole grid.
    pub live_cells: u64,
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Iteration {}. Live cells {}",
            self.generation, self.live_cells
        )
    }
}

/// Whether generation `step` falls on an `every`-generation interval.
///
/// An interval of zero never samples.
pub fn should_sample(step: u64, every: u64) -> bool {
    every != 0 && step % every == 0
}

/// Count `grid`'s live cells across the active workers.
///
/// Every worker in `0..active` must call this for the same generation.
/// Returns the global stats on the coordinator and `None` elsewhere.
pub fn gather_stats<C: Communicator + ?Sized>(
    comm: &mut C,
    grid: &GridBuffer,
    generation: u64,
    active: usize,
) -> Result<Option<GenerationStats>, CommError> {
    let total = reduce_sum(comm, grid.live_count(), WorkerId::COORDINATOR, active)?;
    Ok(total.map(|live_cells| GenerationStats {
        generation,
        live_cells,
    }))
}

/// Write `stats` as one line to `out`, but only on the coordinator.
///
/// Returns whether anything was written.
pub fn report_on_coordinator<W: Write + ?Sized>(
    worker: WorkerId,
    stats: &GenerationStats,
    out: &mut W,
) -> io::Result<bool> {
    if !worker.is_coordinator() {
        return Ok(false);
    }
    writeln!(out, "{stats}")?;
    Ok(true)
}
