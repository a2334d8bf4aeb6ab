//! The point-to-point communicator trait.

use strata_core::WorkerId;

use crate::error::CommError;
use crate::message::{Payload, Tag};

/// Handle for a posted send. Complete it with
/// [`Communicator::wait_send`].
#[must_use = "a posted send must be waited on"]
#[derive(Debug, PartialEq, Eq)]
pub struct SendRequest {
    dest: WorkerId,
    tag: Tag,
}

impl SendRequest {
    /// Record a send to `dest` on `tag`.
    pub fn new(dest: WorkerId, tag: Tag) -> Self {
        Self { dest, tag }
    }

    /// Destination worker.
    pub fn dest(&self) -> WorkerId {
        self.dest
    }

    /// Message tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }
}

/// Handle for a posted receive. Complete it with
/// [`Communicator::wait_recv`].
#[must_use = "a posted receive must be waited on"]
#[derive(Debug, PartialEq, Eq)]
pub struct RecvRequest {
    source: WorkerId,
    tag: Tag,
}

impl RecvRequest {
    /// Record a receive from `source` on `tag`.
    pub fn new(source: WorkerId, tag: Tag) -> Self {
        Self { source, tag }
    }

    /// Worker the message must come from.
    pub fn source(&self) -> WorkerId {
        self.source
    }

    /// Tag the message must carry.
    pub fn tag(&self) -> Tag {
        self.tag
    }
}

/// One worker's endpoint into its group.
///
/// Messages between one pair of workers on one tag are delivered in the
/// order they were sent. Receives match on `(source, tag)`; messages that
/// arrive before a matching receive is waited on are held until it is.
///
/// An implementation must make [`abort`](Self::abort) fail every blocking
/// wait on every other member, and must abort on drop unless
/// [`close`](Self::close) was called.
pub trait Communicator {
    /// This worker's index.
    fn rank(&self) -> WorkerId;

    /// Number of workers in the group.
    fn size(&self) -> usize;

    /// Post a send. The payload is handed off immediately.
    fn isend(&mut self, dest: WorkerId, tag: Tag, payload: Payload)
        -> Result<SendRequest, CommError>;

    /// Post a receive.
    fn irecv(&mut self, source: WorkerId, tag: Tag) -> Result<RecvRequest, CommError>;

    /// Block until a posted send has completed.
    fn wait_send(&mut self, request: SendRequest) -> Result<(), CommError>;

    /// Block until a posted receive has a message, and return its body.
    fn wait_recv(&mut self, request: RecvRequest) -> Result<Payload, CommError>;

    /// Tell every other worker the group is finished with an error.
    fn abort(&mut self);

    /// Mark a clean shutdown so dropping the endpoint does not abort.
    fn close(&mut self);

    /// Blocking send.
    fn send(&mut self, dest: WorkerId, tag: Tag, payload: Payload) -> Result<(), CommError> {
        let request = self.isend(dest, tag, payload)?;
        self.wait_send(request)
    }

    /// Blocking receive.
    fn recv(&mut self, source: WorkerId, tag: Tag) -> Result<Payload, CommError> {
        let request = self.irecv(source, tag)?;
        self.wait_recv(request)
    }
}
