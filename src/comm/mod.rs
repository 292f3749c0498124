//! Blocking worker-to-worker transport.
//!
//! The generator only talks to its peers through [`Communicator`], the way an SPMD
//! program talks to its message-passing runtime: a paired send/receive with one peer,
//! a sum reduction over all workers and an ordered gather to a root. Every call blocks
//! until it completes, and every worker has to make the same sequence of collective
//! calls or the run stalls.

pub mod local;

use crate::maze::Cell;

pub use local::LocalComm;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommError {
    #[error("worker {peer} is no longer reachable")]
    Disconnected { peer: usize },
    #[error("worker {peer} sent an unexpected {got} message")]
    UnexpectedPayload { peer: usize, got: &'static str },
    #[error("worker {peer} sent {got} cells, expected {expected}")]
    LengthMismatch {
        peer: usize,
        expected: usize,
        got: usize,
    },
}

pub trait Communicator {
    /// Index of this worker, `0..size()`.
    fn rank(&self) -> usize;

    /// Number of workers in the run.
    fn size(&self) -> usize;

    /// Sends `send` to `peer` and receives the same number of cells from it into `recv`.
    /// A `None` peer makes the call a no-op.
    fn sendrecv(
        &mut self,
        peer: Option<usize>,
        send: &[Cell],
        recv: &mut [Cell],
    ) -> Result<(), CommError>;

    /// Sums `value` over all workers; every worker receives the total.
    fn all_reduce_sum(&mut self, value: usize) -> Result<usize, CommError>;

    /// Collects every worker's `block` on `root`, concatenated in rank order.
    /// Non-root workers get `None`.
    fn gather(&mut self, root: usize, block: &[Cell]) -> Result<Option<Vec<Cell>>, CommError>;
}
