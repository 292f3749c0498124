use crate::error::ConfigError;

/// The slice of the global grid owned by one worker.
///
/// Rows are split in equal contiguous bands: worker `r` owns global rows
/// `[r * n_loc, (r + 1) * n_loc)`. Columns are never split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    rank: usize,
    workers: usize,
    rows: usize,
    cols: usize,
    n_loc: usize,
}

impl Partition {
    pub fn new(rank: usize, workers: usize, rows: usize, cols: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if rank >= workers {
            return Err(ConfigError::RankOutOfRange { rank, workers });
        }
        if rows % workers != 0 || rows < workers {
            return Err(ConfigError::NotDivisible { rows, workers });
        }
        Ok(Partition {
            rank,
            workers,
            rows,
            cols,
            n_loc: rows / workers,
        })
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Global row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows owned by this worker.
    pub fn n_loc(&self) -> usize {
        self.n_loc
    }

    /// Global index of the first owned row.
    pub fn start_row(&self) -> usize {
        self.rank * self.n_loc
    }

    /// Neighbor owning the rows just above this band.
    pub fn up(&self) -> Option<usize> {
        self.rank.checked_sub(1)
    }

    /// Neighbor owning the rows just below this band.
    pub fn down(&self) -> Option<usize> {
        (self.rank + 1 < self.workers).then_some(self.rank + 1)
    }

    pub fn is_top(&self) -> bool {
        self.rank == 0
    }

    pub fn is_bottom(&self) -> bool {
        self.rank + 1 == self.workers
    }

    pub fn owns_global_row(&self, global: usize) -> bool {
        (self.start_row()..self.start_row() + self.n_loc).contains(&global)
    }

    /// Maps a local row (1-based, ghost rows at `0` and `n_loc + 1`) to its global index.
    /// Ghost rows map to the neighbor's rows and return `None` past the grid edges.
    pub fn global_row(&self, local: usize) -> Option<usize> {
        (self.start_row() + local)
            .checked_sub(1)
            .filter(|&g| g < self.rows)
    }

    /// Maps an owned global row to its local index.
    pub fn local_row(&self, global: usize) -> Option<usize> {
        self.owns_global_row(global)
            .then(|| global - self.start_row() + 1)
    }

    /// Number of islands this worker places. Rank 0 takes the remainder.
    pub fn island_share(&self, islands: usize) -> usize {
        let share = islands / self.workers;
        if self.is_top() {
            share + islands % self.workers
        } else {
            share
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_bands() {
        let parts = (0..4)
            .map(|r| Partition::new(r, 4, 12, 7).unwrap())
            .collect::<Vec<_>>();
        assert!(parts.iter().all(|p| p.n_loc() == 3));
        assert_eq!(
            parts.iter().map(|p| p.start_row()).collect::<Vec<_>>(),
            vec![0, 3, 6, 9]
        );
        // Every global row is owned by exactly one worker
        for g in 0..12 {
            assert_eq!(parts.iter().filter(|p| p.owns_global_row(g)).count(), 1);
        }
    }

    #[test]
    fn test_neighbors() {
        let top = Partition::new(0, 3, 9, 5).unwrap();
        let mid = Partition::new(1, 3, 9, 5).unwrap();
        let bottom = Partition::new(2, 3, 9, 5).unwrap();
        assert_eq!((top.up(), top.down()), (None, Some(1)));
        assert_eq!((mid.up(), mid.down()), (Some(0), Some(2)));
        assert_eq!((bottom.up(), bottom.down()), (Some(1), None));
        assert!(top.is_top() && !top.is_bottom());
        assert!(bottom.is_bottom());
    }

    #[test]
    fn test_row_mapping() {
        let p = Partition::new(1, 3, 9, 5).unwrap();
        assert_eq!(p.global_row(0), Some(2));
        assert_eq!(p.global_row(1), Some(3));
        assert_eq!(p.global_row(4), Some(6));
        assert_eq!(p.local_row(5), Some(3));
        assert_eq!(p.local_row(6), None);

        let top = Partition::new(0, 3, 9, 5).unwrap();
        assert_eq!(top.global_row(0), None);
        let bottom = Partition::new(2, 3, 9, 5).unwrap();
        assert_eq!(bottom.global_row(4), None);
    }

    #[test]
    fn test_rejects_uneven_split() {
        assert_eq!(
            Partition::new(0, 4, 10, 10),
            Err(ConfigError::NotDivisible { rows: 10, workers: 4 })
        );
        assert_eq!(Partition::new(0, 0, 10, 10), Err(ConfigError::NoWorkers));
        assert_eq!(
            Partition::new(3, 3, 9, 9),
            Err(ConfigError::RankOutOfRange { rank: 3, workers: 3 })
        );
    }

    #[test]
    fn test_island_share() {
        let shares = (0..3)
            .map(|r| Partition::new(r, 3, 9, 9).unwrap().island_share(20))
            .collect::<Vec<_>>();
        assert_eq!(shares, vec![8, 6, 6]);
    }
}
