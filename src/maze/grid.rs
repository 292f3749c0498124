use std::fmt;

use super::cell::Cell;

/// Row-major 2-D array of cells, indexed by `(row, col)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    data: Box<[Cell]>,
    rows: usize,
    cols: usize,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, cell: Cell) -> Self {
        let data = vec![cell; rows * cols].into_boxed_slice();
        Grid { data, rows, cols }
    }

    /// Builds a grid from row-major cell data. Returns `None` if the length does not match.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Option<Self> {
        (cells.len() == rows * cols).then(|| Grid {
            data: cells.into_boxed_slice(),
            rows,
            cols,
        })
    }

    /// A grid with walls on its border and free cells inside.
    pub fn bordered(rows: usize, cols: usize) -> Self {
        let mut grid = Grid::new(rows, cols, Cell::Free);
        (0..rows).for_each(|i| {
            (0..cols).for_each(|j| {
                if grid.is_border(i, j) {
                    grid[(i, j)] = Cell::Wall;
                }
            })
        });
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[Cell] {
        &self.data
    }

    pub fn is_border(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i + 1 == self.rows || j + 1 == self.cols
    }

    pub fn row(&self, i: usize) -> &[Cell] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [Cell] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Contiguous slice covering rows `start..end`.
    pub fn rows_slice(&self, start: usize, end: usize) -> &[Cell] {
        &self.data[start * self.cols..end * self.cols]
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.data.iter().filter(|&&c| c == cell).count()
    }

    fn ravel_index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.rows && j < self.cols, "({i}, {j}) is out of bounds");
        i * self.cols + j
    }
}

impl std::ops::Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let idx = self.ravel_index(index.0, index.1);
        &mut self.data[idx]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for cell in self.row(i) {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
