use std::ops::RangeInclusive;

use super::{cell::Cell, grid::Grid};
use crate::partition::Partition;

/// A worker's band of the global grid.
///
/// Local row `0` and local row `n_loc + 1` are ghost rows mirroring the neighbors'
/// boundary rows. Rows `1..=n_loc` are owned.
pub struct Band {
    grid: Grid,
    partition: Partition,
}

impl Band {
    /// Allocates the band with border walls placed by global coordinates and
    /// free ghost rows.
    pub fn new(partition: Partition) -> Self {
        let n_loc = partition.n_loc();
        let cols = partition.cols();
        let mut grid = Grid::new(n_loc + 2, cols, Cell::Free);
        for i in 1..=n_loc {
            let global = partition.start_row() + i - 1;
            let edge_row = global == 0 || global + 1 == partition.rows();
            for j in 0..cols {
                if edge_row || j == 0 || j + 1 == cols {
                    grid[(i, j)] = Cell::Wall;
                }
            }
        }
        Band { grid, partition }
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn n_loc(&self) -> usize {
        self.partition.n_loc()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn owned_rows(&self) -> RangeInclusive<usize> {
        1..=self.n_loc()
    }

    pub fn first_row(&self) -> usize {
        1
    }

    pub fn last_row(&self) -> usize {
        self.n_loc()
    }

    pub fn top_ghost(&self) -> usize {
        0
    }

    pub fn bottom_ghost(&self) -> usize {
        self.n_loc() + 1
    }

    /// Whether the owned local row `i` is the first or last row of the whole grid.
    pub fn is_global_edge_row(&self, i: usize) -> bool {
        matches!(self.partition.global_row(i), Some(g) if g == 0 || g + 1 == self.partition.rows())
    }

    /// The owned rows without the ghosts, in row-major order.
    pub fn owned_block(&self) -> &[Cell] {
        self.grid.rows_slice(1, self.n_loc() + 1)
    }

    /// Number of constructible cells in the owned rows.
    pub fn count_constructible(&self) -> usize {
        self.owned_block()
            .iter()
            .filter(|&&c| c == Cell::Constructible)
            .count()
    }
}

impl std::ops::Index<(usize, usize)> for Band {
    type Output = Cell;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.grid[index]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Band {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.grid[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_borders_use_global_rows() {
        let top = Band::new(Partition::new(0, 2, 6, 5).unwrap());
        let bottom = Band::new(Partition::new(1, 2, 6, 5).unwrap());

        // Global row 0 lives in the top band, global row 5 in the bottom one
        assert!(top.grid().row(1).iter().all(|c| c.is_wall()));
        assert!(bottom.grid().row(3).iter().all(|c| c.is_wall()));
        // The band boundary itself is not a wall
        assert_eq!(top[(3, 2)], Cell::Free);
        assert_eq!(bottom[(1, 2)], Cell::Free);
        // Side columns are walls in every band
        assert!(bottom.owned_rows().all(|i| bottom[(i, 0)].is_wall() && bottom[(i, 4)].is_wall()));
    }

    #[test]
    fn test_ghost_rows_start_free() {
        let band = Band::new(Partition::new(1, 3, 9, 4).unwrap());
        assert!(band.grid().row(band.top_ghost()).iter().all(|&c| c == Cell::Free));
        assert!(band.grid().row(band.bottom_ghost()).iter().all(|&c| c == Cell::Free));
        assert_eq!(band.grid().rows(), 5);
    }

    #[test]
    fn test_owned_block_excludes_ghosts() {
        let band = Band::new(Partition::new(0, 1, 4, 3).unwrap());
        assert_eq!(band.owned_block().len(), 4 * 3);
        assert_eq!(band.owned_block(), Grid::bordered(4, 3).cells());
        assert!(band.is_global_edge_row(1));
        assert!(!band.is_global_edge_row(2));
        assert!(band.is_global_edge_row(4));
    }
}
