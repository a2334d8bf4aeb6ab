//! Collective operations built from point-to-point messages.
//!
//! Both collectives are rooted: contributors talk only to the root, so
//! messages from different rounds never interleave on one `(source, tag)`
//! pair out of order.

use strata_core::WorkerId;

use crate::comm::Communicator;
use crate::error::CommError;
use crate::message::{Payload, Tag};

/// Sum `value` over workers `0..participants` at `root`.
///
/// Returns `Some(total)` on the root and `None` everywhere else. Workers
/// outside `0..participants` must not call this.
pub fn reduce_sum<C: Communicator + ?Sized>(
    comm: &mut C,
    value: u64,
    root: WorkerId,
    participants: usize,
) -> Result<Option<u64>, CommError> {
    debug_assert!(
        comm.rank().index() < participants,
        "worker {} is not a reduction participant",
        comm.rank()
    );
    if comm.rank() != root {
        comm.send(root, Tag::Reduce, Payload::Count(value))?;
        return Ok(None);
    }

    let mut total = value;
    for peer in (0..participants).map(WorkerId).filter(|&w| w != root) {
        match comm.recv(peer, Tag::Reduce)? {
            Payload::Count(v) => total += v,
            _ => {
                return Err(CommError::UnexpectedPayload {
                    peer,
                    tag: Tag::Reduce,
                })
            }
        }
    }
    Ok(Some(total))
}

/// Block until every worker in the group has called `barrier`.
///
/// Every worker reports to the coordinator, which releases them all once
/// the last one has arrived.
pub fn barrier<C: Communicator + ?Sized>(comm: &mut C) -> Result<(), CommError> {
    let root = WorkerId::COORDINATOR;
    if comm.rank() != root {
        comm.send(root, Tag::BarrierArrive, Payload::Signal)?;
        comm.recv(root, Tag::BarrierRelease)?;
        return Ok(());
    }

    let others: Vec<WorkerId> = (1..comm.size()).map(WorkerId).collect();
    for &peer in &others {
        comm.recv(peer, Tag::BarrierArrive)?;
    }
    for &peer in &others {
        comm.send(peer, Tag::BarrierRelease, Payload::Signal)?;
    }
    Ok(())
}
