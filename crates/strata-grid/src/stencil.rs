//! The B3/S23 neighbour-count rule.
//!
//! Vertical neighbours come straight from the halo-padded buffer; the halo
//! rows already hold the wrapped rows of the ring neighbours. Columns wrap
//! here.

use crate::buffer::GridBuffer;
use crate::{Cell, ALIVE, DEAD};

/// Column to the left of `col` on a ring of `cols` columns.
#[inline]
pub fn wrap_left(col: usize, cols: usize) -> usize {
    if col == 0 {
        cols - 1
    } else {
        col - 1
    }
}

/// Column to the right of `col` on a ring of `cols` columns.
#[inline]
pub fn wrap_right(col: usize, cols: usize) -> usize {
    if col + 1 == cols {
        0
    } else {
        col + 1
    }
}

/// Next state of a cell with `live_neighbours` live neighbours.
#[inline]
pub fn next_state(current: Cell, live_neighbours: u8) -> Cell {
    match (current, live_neighbours) {
        (ALIVE, 2) | (ALIVE, 3) => ALIVE,
        (DEAD, 3) => ALIVE,
        _ => DEAD,
    }
}

/// Sum of the eight neighbours of owned cell `(row, col)`.
pub fn live_neighbours(grid: &GridBuffer, row: usize, col: usize) -> u8 {
    let cols = grid.cols();
    let left = wrap_left(col, cols);
    let right = wrap_right(col, cols);

    let above = grid.row(row - 1);
    let here = grid.row(row);
    let below = grid.row(row + 1);

    above[left]
        + above[col]
        + above[right]
        + here[left]
        + here[right]
        + below[left]
        + below[col]
        + below[right]
}

/// Compute the owned rows of `next` from `current`.
///
/// `current`'s halo rows must already hold this generation's exchange.
/// `next`'s halo rows are left as they are.
///
/// # Panics
///
/// Panics if the two buffers differ in shape.
pub fn step(current: &GridBuffer, next: &mut GridBuffer) {
    assert_eq!(
        (current.local_rows(), current.cols()),
        (next.local_rows(), next.cols()),
        "current and next buffers differ in shape"
    );
    for r in current.owned_rows() {
        for c in 0..current.cols() {
            let n = live_neighbours(current, r, c);
            next.set(r, c, next_state(current.get(r, c), n));
        }
    }
}
