// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Communicator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rank-group message passing for scalar `f64` exchanges.
//!
//! [`Communicator`] is the seam an rsmpi communicator would plug into.
//! Two implementations ship here:
//!
//! - [`SingleProcessComm`]: a group of one; collectives return the
//!   caller's own contribution.
//! - [`ThreadComm`]: one endpoint per thread, connected by a dedicated
//!   `mpsc` channel for every ordered rank pair. Messages between a pair
//!   are FIFO, so collectives stay matched as long as every rank issues
//!   them in the same order. Dropping an endpoint disconnects its
//!   channels, which surfaces on peers as a communication error rather
//!   than a hang.

use std::sync::mpsc::{channel, Receiver, Sender};

use npts_types::constants::MAX_WORKERS;
use npts_types::error::{check_worker_count, NptsError, NptsResult};

/// Purpose of a message. Receivers check it against what they expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTag {
    /// Pipeline hand-off of the last `beta` to the right neighbour.
    BoundaryBeta,
    AllGather,
    Broadcast,
    Barrier,
}

#[derive(Debug, Clone, Copy)]
struct Envelope {
    tag: MessageTag,
    value: f64,
}

pub trait Communicator {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Point-to-point send. Never blocks on the receiver.
    fn send(&self, dest: usize, tag: MessageTag, value: f64) -> NptsResult<()>;

    /// Blocking point-to-point receive from `source`.
    fn recv(&self, source: usize, tag: MessageTag) -> NptsResult<f64>;

    /// Every rank contributes one value; every rank gets all of them,
    /// indexed by rank.
    fn all_gather(&self, value: f64) -> NptsResult<Vec<f64>> {
        self.gather_tagged(value, MessageTag::AllGather)
    }

    /// `root` distributes `value`; the argument is ignored on other ranks.
    fn broadcast(&self, value: f64, root: usize) -> NptsResult<f64> {
        let rank = self.rank();
        if root >= self.size() {
            return Err(NptsError::Communication {
                rank,
                message: format!("broadcast root {root} outside group of {}", self.size()),
            });
        }
        if rank == root {
            for dest in (0..self.size()).filter(|&d| d != root) {
                self.send(dest, MessageTag::Broadcast, value)?;
            }
            Ok(value)
        } else {
            self.recv(root, MessageTag::Broadcast)
        }
    }

    /// Returns once every rank has entered the barrier.
    fn barrier(&self) -> NptsResult<()> {
        self.gather_tagged(0.0, MessageTag::Barrier).map(|_| ())
    }

    #[doc(hidden)]
    fn gather_tagged(&self, value: f64, tag: MessageTag) -> NptsResult<Vec<f64>> {
        let rank = self.rank();
        for dest in (0..self.size()).filter(|&d| d != rank) {
            self.send(dest, tag, value)?;
        }
        let mut gathered = Vec::with_capacity(self.size());
        for source in 0..self.size() {
            if source == rank {
                gathered.push(value);
            } else {
                gathered.push(self.recv(source, tag)?);
            }
        }
        Ok(gathered)
    }
}

/// Group of one. Point-to-point traffic has no valid peer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleProcessComm;

impl Communicator for SingleProcessComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn send(&self, dest: usize, _tag: MessageTag, _value: f64) -> NptsResult<()> {
        Err(NptsError::Communication {
            rank: 0,
            message: format!("single-process group has no rank {dest}"),
        })
    }

    fn recv(&self, source: usize, _tag: MessageTag) -> NptsResult<f64> {
        Err(NptsError::Communication {
            rank: 0,
            message: format!("single-process group has no rank {source}"),
        })
    }
}

/// One rank's endpoint in a thread-backed group.
pub struct ThreadComm {
    rank: usize,
    size: usize,
    /// Indexed by destination rank; `None` at our own rank.
    outboxes: Vec<Option<Sender<Envelope>>>,
    /// Indexed by source rank; `None` at our own rank.
    inboxes: Vec<Option<Receiver<Envelope>>>,
}

impl std::fmt::Debug for ThreadComm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadComm")
            .field("rank", &self.rank)
            .field("size", &self.size)
            .finish()
    }
}

impl ThreadComm {
    /// Fully connected group of `size` endpoints, index = rank. Move each
    /// endpoint to its own thread.
    ///
    /// `size` is capped at [`MAX_WORKERS`]: the group holds one channel per
    /// ordered rank pair.
    pub fn group(size: usize) -> NptsResult<Vec<ThreadComm>> {
        check_worker_count(size)?;
        let mut outboxes: Vec<Vec<Option<Sender<Envelope>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
        let mut inboxes: Vec<Vec<Option<Receiver<Envelope>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
        for src in 0..size {
            for dst in (0..size).filter(|&d| d != src) {
                let (tx, rx) = channel();
                outboxes[src][dst] = Some(tx);
                inboxes[dst][src] = Some(rx);
            }
        }
        Ok(outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outboxes, inboxes))| ThreadComm {
                rank,
                size,
                outboxes,
                inboxes,
            })
            .collect())
    }

    fn peer_error(&self, peer: usize, what: &str) -> NptsError {
        NptsError::Communication {
            rank: self.rank,
            message: format!("{what} rank {peer} (group size {})", self.size),
        }
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, dest: usize, tag: MessageTag, value: f64) -> NptsResult<()> {
        let outbox = self
            .outboxes
            .get(dest)
            .and_then(Option::as_ref)
            .ok_or_else(|| self.peer_error(dest, "no channel to"))?;
        tracing::trace!(rank = self.rank, dest, ?tag, value, "send");
        outbox
            .send(Envelope { tag, value })
            .map_err(|_| self.peer_error(dest, "disconnected from"))
    }

    fn recv(&self, source: usize, tag: MessageTag) -> NptsResult<f64> {
        let inbox = self
            .inboxes
            .get(source)
            .and_then(Option::as_ref)
            .ok_or_else(|| self.peer_error(source, "no channel from"))?;
        let envelope = inbox
            .recv()
            .map_err(|_| self.peer_error(source, "disconnected from"))?;
        if envelope.tag != tag {
            return Err(NptsError::Communication {
                rank: self.rank,
                message: format!(
                    "expected {tag:?} from rank {source}, received {:?}",
                    envelope.tag
                ),
            });
        }
        tracing::trace!(rank = self.rank, source, ?tag, value = envelope.value, "recv");
        Ok(envelope.value)
    }
}
