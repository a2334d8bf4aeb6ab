//! Message tags and payloads.

use std::fmt;

use strata_core::WorkerId;
use strata_grid::Cell;

/// What a message is for. Receives match on `(source, tag)`.
///
/// The two halo tags are named after where the *receiver* stores the row:
/// a row travelling down the ring lands in the receiver's top halo, a row
/// travelling up lands in its bottom halo. Both ends of a ring edge agree
/// on this without further metadata, even when `up == down`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Sender's last owned row, for the receiver's top halo.
    TopHalo,
    /// Sender's first owned row, for the receiver's bottom halo.
    BottomHalo,
    /// A contribution to a sum-reduction.
    Reduce,
    /// A worker has reached the barrier.
    BarrierArrive,
    /// The coordinator releases the barrier.
    BarrierRelease,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopHalo => write!(f, "top-halo"),
            Self::BottomHalo => write!(f, "bottom-halo"),
            Self::Reduce => write!(f, "reduce"),
            Self::BarrierArrive => write!(f, "barrier-arrive"),
            Self::BarrierRelease => write!(f, "barrier-release"),
        }
    }
}

/// Message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// One grid row, stamped with the generation it belongs to.
    Row {
        /// Generation the sender was exchanging.
        generation: u64,
        /// Row contents.
        cells: Vec<Cell>,
    },
    /// A count for reductions.
    Count(u64),
    /// No body; the tag says it all.
    Signal,
}

/// A message in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Sending worker.
    pub source: WorkerId,
    /// Message tag.
    pub tag: Tag,
    /// Message body.
    pub payload: Payload,
}
