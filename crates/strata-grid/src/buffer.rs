//! Halo-padded grid buffers and the current/next ping-pong pair.
//!
//! # Buffer layout
//!
//! ```text
//! row 0               top halo     (copy of the up neighbour's last row)
//! rows 1..=local_rows owned rows
//! row local_rows + 1  bottom halo  (copy of the down neighbour's first row)
//! ```
//!
//! Storage is one flat row-major `Vec`; [`GridBuffer::index`] is the only
//! place the 2D shape is interpreted.

use std::ops::RangeInclusive;

use crate::{Cell, ALIVE, DEAD};

/// One halo-padded slice of the global grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridBuffer {
    local_rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl GridBuffer {
    /// Allocate a zeroed buffer for `local_rows` owned rows of `cols` cells.
    pub fn new(local_rows: usize, cols: usize) -> Self {
        Self {
            local_rows,
            cols,
            cells: vec![DEAD; (local_rows + 2) * cols],
        }
    }

    /// Build a buffer whose owned rows are `owned` (row-major,
    /// `local_rows * cols` cells); halo rows start dead.
    ///
    /// # Panics
    ///
    /// Panics if `cols == 0` or `owned.len()` is not a multiple of `cols`.
    pub fn from_owned_rows(owned: &[Cell], cols: usize) -> Self {
        assert!(cols > 0, "grid needs at least one column");
        assert_eq!(
            owned.len() % cols,
            0,
            "{} cells do not form rows of {cols}",
            owned.len()
        );
        let mut buf = Self::new(owned.len() / cols, cols);
        let start = buf.index(1, 0);
        buf.cells[start..start + owned.len()].copy_from_slice(owned);
        buf
    }

    /// Number of owned rows.
    pub fn local_rows(&self) -> usize {
        self.local_rows
    }

    /// Number of columns (the global grid side length).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Local index of the top halo row.
    pub const fn top_halo(&self) -> usize {
        0
    }

    /// Local index of the bottom halo row.
    pub fn bottom_halo(&self) -> usize {
        self.local_rows + 1
    }

    /// Local indices of the owned rows.
    pub fn owned_rows(&self) -> RangeInclusive<usize> {
        1..=self.local_rows
    }

    /// Flat index of `(row, col)`, row counted including the top halo.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.local_rows + 2, "row {row} out of range");
        debug_assert!(col < self.cols, "col {col} out of range");
        row * self.cols + col
    }

    /// Cell at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Overwrite the cell at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, state: Cell) {
        let i = self.index(row, col);
        self.cells[i] = state;
    }

    /// Row `row` as a slice.
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = self.index(row, 0);
        &self.cells[start..start + self.cols]
    }

    /// Row `row` as a mutable slice.
    pub fn row_mut(&mut self, row: usize) -> &mut [Cell] {
        let start = self.index(row, 0);
        let cols = self.cols;
        &mut self.cells[start..start + cols]
    }

    /// The owned rows, flattened, without halos.
    pub fn owned_cells(&self) -> &[Cell] {
        let start = self.cols;
        &self.cells[start..start + self.local_rows * self.cols]
    }

    /// Number of live owned cells. Halo rows are not counted.
    pub fn live_count(&self) -> u64 {
        self.owned_cells().iter().filter(|&&c| c == ALIVE).count() as u64
    }

    /// The whole buffer including halos.
    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }
}

/// The "current" and "next" buffers of one worker.
///
/// The stencil reads `current` and writes `next` through
/// [`split`](Self::split), whose borrows make it impossible to mutate
/// `current` during a compute phase. [`swap`](Self::swap) then flips the
/// roles without copying data; halo rows travel with their buffer and are
/// overwritten by the next exchange.
#[derive(Clone, Debug)]
pub struct DoubleBuffer {
    current: GridBuffer,
    next: GridBuffer,
}

impl DoubleBuffer {
    /// Allocate both buffers zeroed.
    pub fn new(local_rows: usize, cols: usize) -> Self {
        Self::from_current(GridBuffer::new(local_rows, cols))
    }

    /// Start from an existing current buffer; `next` gets the same shape.
    pub fn from_current(current: GridBuffer) -> Self {
        let next = GridBuffer::new(current.local_rows(), current.cols());
        Self { current, next }
    }

    /// The buffer holding the present generation.
    pub fn current(&self) -> &GridBuffer {
        &self.current
    }

    /// Mutable access to the present generation (seeding, halo receipt).
    pub fn current_mut(&mut self) -> &mut GridBuffer {
        &mut self.current
    }

    /// Borrow `current` for reading and `next` for writing.
    pub fn split(&mut self) -> (&GridBuffer, &mut GridBuffer) {
        (&self.current, &mut self.next)
    }

    /// Exchange the roles of the two buffers.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_includes_two_halo_rows() {
        let buf = GridBuffer::new(3, 5);
        assert_eq!(buf.as_slice().len(), 5 * 5);
        assert_eq!(buf.top_halo(), 0);
        assert_eq!(buf.bottom_halo(), 4);
        assert_eq!(buf.owned_rows(), 1..=3);
        assert_eq!(buf.owned_cells().len(), 15);
    }

    #[test]
    fn rows_are_contiguous_and_row_major() {
        let mut buf = GridBuffer::new(2, 3);
        buf.set(1, 2, ALIVE);
        buf.set(2, 0, ALIVE);
        assert_eq!(buf.index(1, 2), 5);
        assert_eq!(buf.row(1), &[0, 0, 1]);
        assert_eq!(buf.row(2), &[1, 0, 0]);
        assert_eq!(buf.owned_cells(), &[0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn live_count_ignores_halos() {
        let mut buf = GridBuffer::new(2, 4);
        buf.row_mut(0).fill(ALIVE);
        buf.row_mut(3).fill(ALIVE);
        buf.set(1, 1, ALIVE);
        buf.set(2, 3, ALIVE);
        assert_eq!(buf.live_count(), 2);
    }

    #[test]
    fn from_owned_rows_places_data_below_top_halo() {
        let buf = GridBuffer::from_owned_rows(&[1, 0, 0, 1], 2);
        assert_eq!(buf.local_rows(), 2);
        assert_eq!(buf.row(0), &[0, 0]);
        assert_eq!(buf.row(1), &[1, 0]);
        assert_eq!(buf.row(2), &[0, 1]);
        assert_eq!(buf.row(3), &[0, 0]);
    }

    #[test]
    fn swap_flips_roles_without_copying() {
        let mut db = DoubleBuffer::new(1, 3);
        {
            let (cur, next) = db.split();
            assert_eq!(cur.live_count(), 0);
            next.set(1, 1, ALIVE);
        }
        assert_eq!(db.current().live_count(), 0);
        db.swap();
        assert_eq!(db.current().get(1, 1), ALIVE);
        db.swap();
        assert_eq!(db.current().live_count(), 0);
    }
}
