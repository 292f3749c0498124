use std::path::PathBuf;

use crate::comm::CommError;

/// Invalid generation parameters, detected before any grid is allocated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("the worker count must be at least 1")]
    NoWorkers,
    #[error("rank {rank} is out of range for {workers} workers")]
    RankOutOfRange { rank: usize, workers: usize },
    #[error("{rows} rows cannot be split evenly across {workers} workers")]
    NotDivisible { rows: usize, workers: usize },
    #[error("a {rows}x{cols} grid is too small, both dimensions must be at least 3")]
    TooSmall { rows: usize, cols: usize },
    #[error("a {rows}x{cols} grid is too small for islands, both dimensions must be at least 5")]
    TooSmallForIslands { rows: usize, cols: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("communication failure: {0}")]
    Comm(#[from] CommError),
    #[error("failed to write maze file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("worker {0} panicked")]
    WorkerPanicked(usize),
}
