//! Per-generation halo exchange.
//!
//! ```text
//!            up neighbour
//!     ┌──────────────────────┐
//!     │ last owned row ──────┼──► TopHalo ──► my row 0
//!     └──────────────────────┘
//!     my row 1 ───────────────► BottomHalo ──► up's bottom halo
//!     my row local_rows ──────► TopHalo ─────► down's row 0
//!     ┌──────────────────────┐
//!     │ first owned row ─────┼──► BottomHalo ──► my row local_rows + 1
//!     └──────────────────────┘
//!           down neighbour
//! ```

use tracing::trace;

use strata_core::{Ring, WorkerId};
use strata_grid::{Cell, GridBuffer};

use crate::comm::Communicator;
use crate::error::CommError;
use crate::message::{Payload, Tag};

/// Exchange boundary rows with both ring neighbours for `generation`.
///
/// Posts both receives, then both sends, then waits for all four. The
/// received rows are written into `grid`'s halo rows only after both have
/// arrived and been checked, so a failed exchange leaves the halos as they
/// were.
pub fn exchange_halos<C: Communicator + ?Sized>(
    comm: &mut C,
    ring: Ring,
    generation: u64,
    grid: &mut GridBuffer,
) -> Result<(), CommError> {
    let cols = grid.cols();

    // 1. Post receives.
    let from_up = comm.irecv(ring.up, Tag::TopHalo)?;
    let from_down = comm.irecv(ring.down, Tag::BottomHalo)?;

    // 2. Post sends: first row goes up, last row goes down.
    let to_up = comm.isend(
        ring.up,
        Tag::BottomHalo,
        Payload::Row {
            generation,
            cells: grid.row(1).to_vec(),
        },
    )?;
    let to_down = comm.isend(
        ring.down,
        Tag::TopHalo,
        Payload::Row {
            generation,
            cells: grid.row(grid.local_rows()).to_vec(),
        },
    )?;

    // 3. Wait for all four.
    comm.wait_send(to_up)?;
    comm.wait_send(to_down)?;
    let top = take_row(comm.wait_recv(from_up)?, ring.up, Tag::TopHalo, generation, cols)?;
    let bottom = take_row(
        comm.wait_recv(from_down)?,
        ring.down,
        Tag::BottomHalo,
        generation,
        cols,
    )?;

    let top_halo = grid.top_halo();
    let bottom_halo = grid.bottom_halo();
    grid.row_mut(top_halo).copy_from_slice(&top);
    grid.row_mut(bottom_halo).copy_from_slice(&bottom);

    trace!(worker = %comm.rank(), generation, up = %ring.up, down = %ring.down, "halos exchanged");
    Ok(())
}

fn take_row(
    payload: Payload,
    peer: WorkerId,
    tag: Tag,
    generation: u64,
    cols: usize,
) -> Result<Vec<Cell>, CommError> {
    let Payload::Row {
        generation: found,
        cells,
    } = payload
    else {
        return Err(CommError::UnexpectedPayload { peer, tag });
    };
    if found != generation {
        return Err(CommError::GenerationMismatch {
            peer,
            expected: generation,
            found,
        });
    }
    if cells.len() != cols {
        return Err(CommError::RowWidthMismatch {
            peer,
            expected: cols,
            found: cells.len(),
        });
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::channel_group;
    use strata_test_utils::parse_grid;

    #[test]
    fn ring_of_one_wraps_onto_itself() {
        let mut group = channel_group(1);
        let ring = Ring::of(WorkerId(0), 1);
        let mut grid = GridBuffer::from_owned_rows(&parse_grid("#..\n...\n.##"), 3);

        exchange_halos(&mut group[0], ring, 0, &mut grid).unwrap();

        assert_eq!(grid.row(0), &[0, 1, 1]);
        assert_eq!(grid.row(4), &[1, 0, 0]);
        // Owned rows untouched.
        assert_eq!(grid.owned_cells(), parse_grid("#..\n...\n.##").as_slice());
        group[0].close();
    }

    #[test]
    fn single_owned_row_is_both_boundaries() {
        let mut group = channel_group(1);
        let ring = Ring::of(WorkerId(0), 1);
        let mut grid = GridBuffer::from_owned_rows(&[1, 0, 1, 1], 4);
        exchange_halos(&mut group[0], ring, 3, &mut grid).unwrap();
        assert_eq!(grid.row(0), &[1, 0, 1, 1]);
        assert_eq!(grid.row(2), &[1, 0, 1, 1]);
        group[0].close();
    }

    #[test]
    fn stale_generation_is_detected() {
        let mut group = channel_group(1);
        let c = &mut group[0];
        c.send(
            WorkerId(0),
            Tag::TopHalo,
            Payload::Row {
                generation: 7,
                cells: vec![0; 2],
            },
        )
        .unwrap();
        let mut grid = GridBuffer::from_owned_rows(&[1, 1], 2);
        let err = exchange_halos(c, Ring::of(WorkerId(0), 1), 0, &mut grid).unwrap_err();
        assert_eq!(
            err,
            CommError::GenerationMismatch {
                peer: WorkerId(0),
                expected: 0,
                found: 7
            }
        );
        // The halos were not touched.
        assert_eq!(grid.row(0), &[0, 0]);
        assert_eq!(grid.row(2), &[0, 0]);
        c.close();
    }

    #[test]
    fn wrong_width_is_detected() {
        let mut group = channel_group(1);
        let c = &mut group[0];
        c.send(
            WorkerId(0),
            Tag::TopHalo,
            Payload::Row {
                generation: 0,
                cells: vec![1; 5],
            },
        )
        .unwrap();
        let mut grid = GridBuffer::from_owned_rows(&[0, 0, 0], 3);
        match exchange_halos(c, Ring::of(WorkerId(0), 1), 0, &mut grid) {
            Err(CommError::RowWidthMismatch {
                expected: 3,
                found: 5,
                ..
            }) => {}
            other => panic!("expected RowWidthMismatch, got {other:?}"),
        }
        c.close();
    }
}
