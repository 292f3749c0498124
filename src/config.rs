use crate::error::ConfigError;

/// How each worker seeds its random generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedSource {
    /// Wall-clock time, offset by the worker's rank.
    #[default]
    Clock,
    /// A fixed base seed, offset by the worker's rank. Used for reproducible runs.
    Fixed(u64),
}

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// Number of isolated walls placed in the interior before generation.
    pub islands: usize,
    pub rows: usize,
    pub cols: usize,
    pub workers: usize,
    pub seed: SeedSource,
}

impl GenConfig {
    pub const DEFAULT_ISLANDS: usize = 20;
    pub const DEFAULT_ROWS: usize = 400;
    pub const DEFAULT_COLS: usize = 600;

    /// Rejects any configuration the band decomposition cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (rows, cols) = (self.rows, self.cols);
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if rows < 3 || cols < 3 {
            return Err(ConfigError::TooSmall { rows, cols });
        }
        // Islands are drawn from the columns 2..cols-2
        if self.islands > 0 && (rows < 5 || cols < 5) {
            return Err(ConfigError::TooSmallForIslands { rows, cols });
        }
        if rows % self.workers != 0 || rows < self.workers {
            return Err(ConfigError::NotDivisible {
                rows,
                workers: self.workers,
            });
        }
        Ok(())
    }
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            islands: Self::DEFAULT_ISLANDS,
            rows: Self::DEFAULT_ROWS,
            cols: Self::DEFAULT_COLS,
            workers: 1,
            seed: SeedSource::Clock,
        }
    }
}
