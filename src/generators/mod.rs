use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::{SeedableRng, rngs::StdRng};

pub mod banded;

use banded::{BandWorker, WorkerStats};

use crate::{
    assembler::assemble,
    comm::{Communicator, LocalComm},
    config::{GenConfig, SeedSource},
    error::GenError,
    maze::Grid,
    partition::Partition,
};

/// Distance between the seeds of consecutive ranks.
const RANK_SEED_STRIDE: u64 = 1000;

/// Get the random number generator of worker `rank`.
///
/// Workers never share a generator and their streams are not coordinated, so the same
/// seed with a different worker count yields a different maze.
pub fn get_rng(seed: SeedSource, rank: usize) -> StdRng {
    let offset = (rank as u64).wrapping_mul(RANK_SEED_STRIDE);
    let base = match seed {
        SeedSource::Fixed(s) => s,
        SeedSource::Clock => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default(),
    };
    StdRng::seed_from_u64(base.wrapping_add(offset))
}

/// Result of a complete generation run.
pub struct Generated {
    pub grid: Grid,
    /// Per-worker statistics, indexed by rank.
    pub stats: Vec<WorkerStats>,
    pub elapsed: Duration,
}

impl Generated {
    pub fn rounds(&self) -> usize {
        self.stats.iter().map(|s| s.rounds).max().unwrap_or(0)
    }

    pub fn carved(&self) -> usize {
        self.stats.iter().map(|s| s.carved).sum()
    }
}

/// The program every worker runs: build the band, generate until global convergence
/// and gather the bands on rank 0, which gets the assembled grid.
pub fn run_worker<C: Communicator>(
    config: &GenConfig,
    comm: &mut C,
) -> Result<(Option<Grid>, WorkerStats), GenError> {
    let partition = Partition::new(comm.rank(), comm.size(), config.rows, config.cols)?;
    let mut worker = BandWorker::new(partition, get_rng(config.seed, comm.rank()));
    worker.setup(config.islands, comm)?;
    let stats = worker.run(comm)?;
    let grid = assemble(worker.band(), comm)?;
    Ok((grid, stats))
}

/// Generates a maze with `config.workers` worker threads.
pub fn generate_maze(config: &GenConfig) -> Result<Generated, GenError> {
    config.validate()?;
    tracing::info!(
        "[generate] {}x{} grid, {} islands, {} workers",
        config.rows,
        config.cols,
        config.islands,
        config.workers
    );

    let start = Instant::now();
    let results = std::thread::scope(|s| {
        let handles = LocalComm::world(config.workers)
            .into_iter()
            .map(|mut comm| s.spawn(move || run_worker(config, &mut comm)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .enumerate()
            .map(|(rank, h)| {
                h.join()
                    .unwrap_or_else(|_| Err(GenError::WorkerPanicked(rank)))
            })
            .collect::<Vec<_>>()
    });
    let elapsed = start.elapsed();

    let mut grid = None;
    let mut stats = Vec::with_capacity(results.len());
    for result in results {
        let (band_grid, worker_stats) = result?;
        grid = grid.or(band_grid);
        stats.push(worker_stats);
    }
    let grid = grid.ok_or(GenError::WorkerPanicked(0))?;

    let generated = Generated {
        grid,
        stats,
        elapsed,
    };
    tracing::info!(
        "[generate] converged after {} rounds, {} walls raised in {:?}",
        generated.rounds(),
        generated.carved(),
        generated.elapsed
    );
    Ok(generated)
}
