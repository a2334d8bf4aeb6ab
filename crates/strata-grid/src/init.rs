//! Initial patterns.
//!
//! Seeding only touches owned rows; halo rows are filled by the first
//! exchange. The random pattern uses a seeded ChaCha8 RNG per worker, so a
//! worker's rows depend on the base seed and its own index only.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use strata_core::{InitialPattern, Partition, SimulationConfig};

use crate::buffer::GridBuffer;
use crate::{Cell, ALIVE, DEAD};

/// The glider, top-left corner at global `(0, 0)`, moving down-right.
pub const GLIDER: [[Cell; 3]; 3] = [
    [DEAD, ALIVE, DEAD],
    [DEAD, DEAD, ALIVE],
    [ALIVE, ALIVE, ALIVE],
];

/// Seed for one worker's RNG: the base seed offset by the worker index.
pub fn worker_seed(random_seed: u64, partition: &Partition) -> u64 {
    random_seed.wrapping_add(partition.worker.index() as u64)
}

/// Fill the owned rows of `buffer` according to `config.pattern`.
pub fn seed_pattern(buffer: &mut GridBuffer, partition: &Partition, config: &SimulationConfig) {
    match config.pattern {
        InitialPattern::Random => fill_random(buffer, worker_seed(config.random_seed, partition)),
        InitialPattern::Glider => place_glider(buffer, partition),
    }
}

/// Draw every owned cell uniformly from {0, 1}.
pub fn fill_random(buffer: &mut GridBuffer, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for r in buffer.owned_rows() {
        for cell in buffer.row_mut(r) {
            *cell = rng.random_range(DEAD..=ALIVE);
        }
    }
}

/// Write [`GLIDER`] at the top-left of the global grid.
///
/// Only the worker owning global row 0 writes anything. The mask is clipped
/// to that worker's owned rows and to the grid width, so the glider is
/// truncated rather than spilled into halo rows on tiny grids.
pub fn place_glider(buffer: &mut GridBuffer, partition: &Partition) {
    if partition.row_offset != 0 || partition.is_degenerate() {
        return;
    }
    let rows = GLIDER.len().min(buffer.local_rows());
    let cols = GLIDER[0].len().min(buffer.cols());
    for (r, mask_row) in GLIDER.iter().enumerate().take(rows) {
        buffer.row_mut(r + 1)[..cols].copy_from_slice(&mask_row[..cols]);
    }
}
