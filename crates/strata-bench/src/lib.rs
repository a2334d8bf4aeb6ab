//! Benchmark profiles for the Strata distributed Game of Life.
//!
//! - [`reference_profile`]: 256×256 random grid, the size most benches use
//! - [`stress_profile`]: 1024×1024 random grid for scaling runs
//! - [`seeded_buffer`]: a random single-worker buffer with halos filled

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_core::{InitialPattern, SimulationConfig};
use strata_grid::init::fill_random;
use strata_grid::GridBuffer;

/// 256×256 random grid, 64 generations, no per-generation statistics.
pub fn reference_profile(seed: u64) -> SimulationConfig {
    SimulationConfig {
        grid_size: 256,
        generations: 64,
        stats_every: 64,
        data_every: 64,
        random_seed: seed,
        pattern: InitialPattern::Random,
    }
}

/// 1024×1024 random grid, 16 generations.
pub fn stress_profile(seed: u64) -> SimulationConfig {
    SimulationConfig {
        grid_size: 1024,
        generations: 16,
        stats_every: 16,
        data_every: 16,
        ..reference_profile(seed)
    }
}

/// An `n`-row, `n`-column random buffer as the only worker would hold it,
/// with both halos wrapped from the opposite edge.
pub fn seeded_buffer(n: usize, seed: u64) -> GridBuffer {
    let mut grid = GridBuffer::new(n, n);
    fill_random(&mut grid, seed);
    let first = grid.row(1).to_vec();
    let last = grid.row(n).to_vec();
    grid.row_mut(0).copy_from_slice(&last);
    let bottom = grid.bottom_halo();
    grid.row_mut(bottom).copy_from_slice(&first);
    grid
}
