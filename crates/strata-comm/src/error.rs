//! Communication error types.

use std::error::Error;
use std::fmt;

use strata_core::WorkerId;

use crate::message::Tag;

/// Errors from point-to-point messaging and the protocols built on it.
///
/// None of these are retried. A worker that hits one aborts the group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommError {
    /// A peer's inbox, or this worker's own, is gone.
    Disconnected {
        /// The peer being talked to.
        peer: WorkerId,
    },
    /// Another worker aborted the group.
    Aborted {
        /// The worker that aborted.
        by: WorkerId,
    },
    /// A halo row was stamped with a different generation than the one
    /// being exchanged. The workers are not in lock-step.
    GenerationMismatch {
        /// Sender of the row.
        peer: WorkerId,
        /// Generation this worker is exchanging.
        expected: u64,
        /// Generation on the row.
        found: u64,
    },
    /// A halo row has the wrong number of cells. The workers disagree on
    /// the grid size.
    RowWidthMismatch {
        /// Sender of the row.
        peer: WorkerId,
        /// This worker's row width.
        expected: usize,
        /// Width of the received row.
        found: usize,
    },
    /// A message matched on `(peer, tag)` carried the wrong kind of body.
    UnexpectedPayload {
        /// Sender of the message.
        peer: WorkerId,
        /// Tag it was matched on.
        tag: Tag,
    },
    /// A worker index outside the group.
    InvalidPeer {
        /// The requested worker.
        peer: WorkerId,
        /// Number of workers in the group.
        size: usize,
    },
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { peer } => write!(f, "channel to worker {peer} disconnected"),
            Self::Aborted { by } => write!(f, "worker group aborted by worker {by}"),
            Self::GenerationMismatch {
                peer,
                expected,
                found,
            } => write!(
                f,
                "halo from worker {peer} is for generation {found}, expected {expected}"
            ),
            Self::RowWidthMismatch {
                peer,
                expected,
                found,
            } => write!(
                f,
                "halo from worker {peer} has {found} cells, expected {expected}"
            ),
            Self::UnexpectedPayload { peer, tag } => {
                write!(f, "unexpected payload from worker {peer} on tag {tag}")
            }
            Self::InvalidPeer { peer, size } => {
                write!(f, "worker {peer} is not in a group of {size}")
            }
        }
    }
}

impl Error for CommError {}

impl CommError {
    /// Whether this error only reports that some other worker failed first.
    pub fn is_secondary(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}
