//! In-process transport over crossbeam channels.
//!
//! Every worker owns one unbounded inbox and a sender into every inbox in
//! the group, its own included (a ring of one sends to itself). Sends are
//! eager: the payload is moved into the destination inbox when the send is
//! posted, so [`wait_send`](Communicator::wait_send) never blocks. Receives
//! drain the inbox until a message matching `(source, tag)` shows up and
//! park everything else in an unmatched queue, preserving arrival order.

use std::collections::VecDeque;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use strata_core::WorkerId;

use crate::comm::{Communicator, RecvRequest, SendRequest};
use crate::error::CommError;
use crate::message::{Envelope, Payload, Tag};

/// What travels through an inbox.
#[derive(Debug)]
enum Message {
    Data(Envelope),
    Abort { by: WorkerId },
}

/// One worker's endpoint of a [`channel_group`].
///
/// Dropping an endpoint without calling [`close`](Communicator::close)
/// aborts the group, so a worker that fails or panics never leaves its
/// peers blocked on a receive.
#[derive(Debug)]
pub struct ChannelComm {
    rank: WorkerId,
    peers: Vec<Sender<Message>>,
    inbox: Receiver<Message>,
    unmatched: VecDeque<Envelope>,
    aborted_by: Option<WorkerId>,
    closed: bool,
}

/// Create the endpoints of a group of `size` workers, in worker order.
pub fn channel_group(size: usize) -> Vec<ChannelComm> {
    let (senders, inboxes): (Vec<_>, Vec<_>) =
        (0..size).map(|_| crossbeam_channel::unbounded()).unzip();
    inboxes
        .into_iter()
        .enumerate()
        .map(|(rank, inbox)| ChannelComm {
            rank: WorkerId(rank),
            peers: senders.clone(),
            inbox,
            unmatched: VecDeque::new(),
            aborted_by: None,
            closed: false,
        })
        .collect()
}

impl ChannelComm {
    fn check_peer(&self, peer: WorkerId) -> Result<(), CommError> {
        if peer.index() < self.peers.len() {
            Ok(())
        } else {
            Err(CommError::InvalidPeer {
                peer,
                size: self.peers.len(),
            })
        }
    }

    fn take_unmatched(&mut self, source: WorkerId, tag: Tag) -> Option<Envelope> {
        let pos = self
            .unmatched
            .iter()
            .position(|e| e.source == source && e.tag == tag)?;
        self.unmatched.remove(pos)
    }

    /// Error for a send that found `dest`'s inbox gone.
    ///
    /// A peer that failed broadcast an abort before its inbox closed, so
    /// look for one among the messages already delivered here.
    fn send_failed(&mut self, dest: WorkerId) -> CommError {
        while self.aborted_by.is_none() {
            match self.inbox.try_recv() {
                Ok(Message::Data(envelope)) => self.unmatched.push_back(envelope),
                Ok(Message::Abort { by }) => self.aborted_by = Some(by),
                Err(_) => break,
            }
        }
        match self.aborted_by {
            Some(by) => CommError::Aborted { by },
            None => CommError::Disconnected { peer: dest },
        }
    }

    /// Number of messages received but not yet matched.
    pub fn unmatched_len(&self) -> usize {
        self.unmatched.len()
    }
}

impl Communicator for ChannelComm {
    fn rank(&self) -> WorkerId {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn isend(
        &mut self,
        dest: WorkerId,
        tag: Tag,
        payload: Payload,
    ) -> Result<SendRequest, CommError> {
        self.check_peer(dest)?;
        if let Some(by) = self.aborted_by {
            return Err(CommError::Aborted { by });
        }
        let envelope = Envelope {
            source: self.rank,
            tag,
            payload,
        };
        if self.peers[dest.index()].send(Message::Data(envelope)).is_err() {
            return Err(self.send_failed(dest));
        }
        Ok(SendRequest::new(dest, tag))
    }

    fn irecv(&mut self, source: WorkerId, tag: Tag) -> Result<RecvRequest, CommError> {
        self.check_peer(source)?;
        Ok(RecvRequest::new(source, tag))
    }

    fn wait_send(&mut self, _request: SendRequest) -> Result<(), CommError> {
        Ok(())
    }

    fn wait_recv(&mut self, request: RecvRequest) -> Result<Payload, CommError> {
        let (source, tag) = (request.source(), request.tag());
        if let Some(envelope) = self.take_unmatched(source, tag) {
            return Ok(envelope.payload);
        }
        if let Some(by) = self.aborted_by {
            return Err(CommError::Aborted { by });
        }
        loop {
            match self.inbox.recv() {
                Ok(Message::Data(envelope)) => {
                    if envelope.source == source && envelope.tag == tag {
                        return Ok(envelope.payload);
                    }
                    self.unmatched.push_back(envelope);
                }
                Ok(Message::Abort { by }) => {
                    self.aborted_by = Some(by);
                    return Err(CommError::Aborted { by });
                }
                Err(_) => return Err(CommError::Disconnected { peer: source }),
            }
        }
    }

    fn abort(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        warn!(worker = %self.rank, "aborting worker group");
        for (i, peer) in self.peers.iter().enumerate() {
            if i != self.rank.index() {
                // A peer that already exited has nothing left to interrupt.
                let _ = peer.send(Message::Abort { by: self.rank });
            }
        }
    }

    fn close(&mut self) {
        if !self.unmatched.is_empty() {
            debug!(
                worker = %self.rank,
                unmatched = self.unmatched.len(),
                "closing with unmatched messages"
            );
        }
        self.closed = true;
    }
}

impl Drop for ChannelComm {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(generation: u64, cells: &[u8]) -> Payload {
        Payload::Row {
            generation,
            cells: cells.to_vec(),
        }
    }

    #[test]
    fn group_ranks_are_in_order() {
        let group = channel_group(3);
        let ranks: Vec<WorkerId> = group.iter().map(|c| c.rank()).collect();
        assert_eq!(ranks, vec![WorkerId(0), WorkerId(1), WorkerId(2)]);
        assert!(group.iter().all(|c| c.size() == 3));
        for mut c in group {
            c.close();
        }
    }

    #[test]
    fn send_to_self() {
        let mut group = channel_group(1);
        let c = &mut group[0];
        c.send(WorkerId(0), Tag::TopHalo, row(0, &[1, 0, 1])).unwrap();
        assert_eq!(c.recv(WorkerId(0), Tag::TopHalo).unwrap(), row(0, &[1, 0, 1]));
        c.close();
    }

    #[test]
    fn receives_match_on_tag_not_arrival_order() {
        let mut group = channel_group(2);
        let (a, b) = group.split_at_mut(1);
        let (a, b) = (&mut a[0], &mut b[0]);

        a.send(WorkerId(1), Tag::TopHalo, row(0, &[1])).unwrap();
        a.send(WorkerId(1), Tag::BottomHalo, row(0, &[0])).unwrap();

        assert_eq!(b.recv(WorkerId(0), Tag::BottomHalo).unwrap(), row(0, &[0]));
        assert_eq!(b.unmatched_len(), 1);
        assert_eq!(b.recv(WorkerId(0), Tag::TopHalo).unwrap(), row(0, &[1]));
        assert_eq!(b.unmatched_len(), 0);
        a.close();
        b.close();
    }

    #[test]
    fn same_tag_is_fifo() {
        let mut group = channel_group(2);
        let (a, b) = group.split_at_mut(1);
        let (a, b) = (&mut a[0], &mut b[0]);

        for v in 0..4 {
            a.send(WorkerId(1), Tag::Reduce, Payload::Count(v)).unwrap();
        }
        // Park them all behind an unrelated receive first.
        a.send(WorkerId(1), Tag::Reduce, Payload::Count(99)).unwrap();
        a.send(WorkerId(1), Tag::BarrierArrive, Payload::Signal).unwrap();
        assert_eq!(
            b.recv(WorkerId(0), Tag::BarrierArrive).unwrap(),
            Payload::Signal
        );
        for v in [0, 1, 2, 3, 99] {
            assert_eq!(b.recv(WorkerId(0), Tag::Reduce).unwrap(), Payload::Count(v));
        }
        a.close();
        b.close();
    }

    #[test]
    fn invalid_peer_is_rejected() {
        let mut group = channel_group(2);
        let c = &mut group[0];
        assert_eq!(
            c.isend(WorkerId(2), Tag::Reduce, Payload::Count(1)),
            Err(CommError::InvalidPeer {
                peer: WorkerId(2),
                size: 2
            })
        );
        assert!(c.irecv(WorkerId(5), Tag::Reduce).is_err());
        for c in &mut group {
            c.close();
        }
    }

    #[test]
    fn abort_fails_pending_receives() {
        let mut group = channel_group(3);
        group[2].abort();
        assert_eq!(
            group[0].recv(WorkerId(1), Tag::TopHalo),
            Err(CommError::Aborted { by: WorkerId(2) })
        );
        // Sticky: later receives fail too instead of blocking.
        assert_eq!(
            group[0].recv(WorkerId(1), Tag::BottomHalo),
            Err(CommError::Aborted { by: WorkerId(2) })
        );
        assert_eq!(
            group[1].recv(WorkerId(0), Tag::Reduce),
            Err(CommError::Aborted { by: WorkerId(2) })
        );
        for c in &mut group {
            c.close();
        }
    }

    #[test]
    fn drop_without_close_aborts() {
        let mut group = channel_group(2);
        let failing = group.pop().unwrap();
        drop(failing);
        assert_eq!(
            group[0].recv(WorkerId(1), Tag::TopHalo),
            Err(CommError::Aborted { by: WorkerId(1) })
        );
        group[0].close();
    }

    #[test]
    fn send_to_a_failed_peer_reports_its_abort() {
        let mut group = channel_group(2);
        drop(group.pop());
        assert_eq!(
            group[0].send(WorkerId(1), Tag::TopHalo, row(0, &[1])),
            Err(CommError::Aborted { by: WorkerId(1) })
        );
        group[0].close();
    }

    #[test]
    fn send_to_a_closed_peer_is_a_disconnect() {
        let mut group = channel_group(2);
        let mut done = group.pop().unwrap();
        done.close();
        drop(done);
        assert_eq!(
            group[0].send(WorkerId(1), Tag::TopHalo, row(0, &[1])),
            Err(CommError::Disconnected { peer: WorkerId(1) })
        );
        group[0].close();
    }

    #[test]
    fn messages_sent_before_abort_are_still_delivered() {
        let mut group = channel_group(2);
        let mut sender = group.pop().unwrap();
        sender
            .send(WorkerId(0), Tag::Reduce, Payload::Count(5))
            .unwrap();
        drop(sender);
        assert_eq!(
            group[0].recv(WorkerId(1), Tag::Reduce),
            Ok(Payload::Count(5))
        );
        assert!(group[0].recv(WorkerId(1), Tag::Reduce).is_err());
        group[0].close();
    }
}
