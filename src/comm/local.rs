use std::{
    collections::VecDeque,
    sync::mpsc::{self, Receiver, Sender},
};

use super::{CommError, Communicator};
use crate::maze::Cell;

/// Rank that sums reductions before broadcasting them back.
const REDUCE_ROOT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Halo,
    Reduce,
    Gather,
}

#[derive(Debug)]
enum Payload {
    Cells(Vec<Cell>),
    Count(usize),
}

impl Payload {
    fn kind(&self) -> &'static str {
        match self {
            Payload::Cells(_) => "cells",
            Payload::Count(_) => "count",
        }
    }

    fn into_cells(self, peer: usize) -> Result<Vec<Cell>, CommError> {
        match self {
            Payload::Cells(cells) => Ok(cells),
            other => Err(CommError::UnexpectedPayload {
                peer,
                got: other.kind(),
            }),
        }
    }

    fn into_count(self, peer: usize) -> Result<usize, CommError> {
        match self {
            Payload::Count(count) => Ok(count),
            other => Err(CommError::UnexpectedPayload {
                peer,
                got: other.kind(),
            }),
        }
    }
}

#[derive(Debug)]
struct Message {
    source: usize,
    tag: Tag,
    payload: Payload,
}

/// In-process endpoint for one worker thread.
///
/// Each worker has a single inbox. Receives are matched on `(source, tag)`; messages
/// that arrive before they are asked for wait in `pending`, so messages from the same
/// source and tag are always delivered in send order.
pub struct LocalComm {
    rank: usize,
    /// Senders to every other worker's inbox, `None` at our own rank.
    peers: Vec<Option<Sender<Message>>>,
    inbox: Receiver<Message>,
    pending: VecDeque<Message>,
}

impl LocalComm {
    /// Creates the connected endpoints of a run with `size` workers, indexed by rank.
    pub fn world(size: usize) -> Vec<LocalComm> {
        let (senders, inboxes): (Vec<_>, Vec<_>) = (0..size).map(|_| mpsc::channel()).unzip();
        inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| LocalComm {
                rank,
                peers: senders
                    .iter()
                    .enumerate()
                    .map(|(peer, sender)| (peer != rank).then(|| sender.clone()))
                    .collect(),
                inbox,
                pending: VecDeque::new(),
            })
            .collect()
    }

    fn send(&self, peer: usize, tag: Tag, payload: Payload) -> Result<(), CommError> {
        let sender = self
            .peers
            .get(peer)
            .and_then(Option::as_ref)
            .ok_or(CommError::Disconnected { peer })?;
        sender
            .send(Message {
                source: self.rank,
                tag,
                payload,
            })
            .map_err(|_| CommError::Disconnected { peer })
    }

    fn recv(&mut self, source: usize, tag: Tag) -> Result<Payload, CommError> {
        let matches = |m: &Message| m.source == source && m.tag == tag;
        if let Some(pos) = self.pending.iter().position(matches) {
            if let Some(message) = self.pending.remove(pos) {
                return Ok(message.payload);
            }
        }
        loop {
            let message = self
                .inbox
                .recv()
                .map_err(|_| CommError::Disconnected { peer: source })?;
            if matches(&message) {
                return Ok(message.payload);
            }
            self.pending.push_back(message);
        }
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn sendrecv(
        &mut self,
        peer: Option<usize>,
        send: &[Cell],
        recv: &mut [Cell],
    ) -> Result<(), CommError> {
        let Some(peer) = peer else {
            return Ok(());
        };
        self.send(peer, Tag::Halo, Payload::Cells(send.to_vec()))?;
        let cells = self.recv(peer, Tag::Halo)?.into_cells(peer)?;
        if cells.len() != recv.len() {
            return Err(CommError::LengthMismatch {
                peer,
                expected: recv.len(),
                got: cells.len(),
            });
        }
        recv.copy_from_slice(&cells);
        Ok(())
    }

    fn all_reduce_sum(&mut self, value: usize) -> Result<usize, CommError> {
        if self.rank == REDUCE_ROOT {
            let mut total = value;
            for peer in (0..self.size()).filter(|&p| p != REDUCE_ROOT) {
                total += self.recv(peer, Tag::Reduce)?.into_count(peer)?;
            }
            for peer in (0..self.size()).filter(|&p| p != REDUCE_ROOT) {
                self.send(peer, Tag::Reduce, Payload::Count(total))?;
            }
            Ok(total)
        } else {
            self.send(REDUCE_ROOT, Tag::Reduce, Payload::Count(value))?;
            self.recv(REDUCE_ROOT, Tag::Reduce)?.into_count(REDUCE_ROOT)
        }
    }

    fn gather(&mut self, root: usize, block: &[Cell]) -> Result<Option<Vec<Cell>>, CommError> {
        if self.rank != root {
            self.send(root, Tag::Gather, Payload::Cells(block.to_vec()))?;
            return Ok(None);
        }
        let mut gathered = Vec::with_capacity(block.len() * self.size());
        for peer in 0..self.size() {
            if peer == root {
                gathered.extend_from_slice(block);
                continue;
            }
            let cells = self.recv(peer, Tag::Gather)?.into_cells(peer)?;
            if cells.len() != block.len() {
                return Err(CommError::LengthMismatch {
                    peer,
                    expected: block.len(),
                    got: cells.len(),
                });
            }
            gathered.extend(cells);
        }
        Ok(Some(gathered))
    }
}
