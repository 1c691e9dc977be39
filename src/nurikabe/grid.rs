//! Grid geometry for Nurikabe instances

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported side length; cell codes are two decimal digits per axis.
pub const MAX_SIDE: usize = 100;

/// A cell addressed by `(row, col)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Orthogonal step distance between two cells
    pub fn manhattan(&self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Coordinate-sum parity, preserved by every second orthogonal step
    pub fn parity(&self) -> usize {
        (self.row + self.col) % 2
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Fixed-size rectangular board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub height: usize,
    pub width: usize,
}

impl Grid {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Convert a cell to its row-major index
    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    /// Convert a row-major index back to a cell
    #[inline]
    pub fn cell(&self, index: usize) -> Cell {
        Cell::new(index / self.width, index % self.width)
    }

    pub fn len(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.len()).map(move |index| self.cell(index))
    }

    /// In-grid orthogonal neighbours, in the order up, left, right, down
    pub fn neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        const STEPS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
        STEPS.into_iter().filter_map(move |(dr, dc)| {
            let row = cell.row.checked_add_signed(dr)?;
            let col = cell.col.checked_add_signed(dc)?;
            let next = Cell::new(row, col);
            self.contains(next).then_some(next)
        })
    }

    /// The right-hand neighbour, if any
    pub fn right(&self, cell: Cell) -> Option<Cell> {
        let next = Cell::new(cell.row, cell.col + 1);
        self.contains(next).then_some(next)
    }

    /// The neighbour below, if any
    pub fn below(&self, cell: Cell) -> Option<Cell> {
        let next = Cell::new(cell.row + 1, cell.col);
        self.contains(next).then_some(next)
    }

    /// Top-left corners of every 2x2 block
    pub fn squares(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells()
            .filter(move |cell| cell.row + 1 < self.height && cell.col + 1 < self.width)
    }

    /// Squared distance to the grid centre, doubled on both axes to stay integral
    pub fn centre_distance(&self, cell: Cell) -> usize {
        let dr = (2 * cell.row).abs_diff(self.height - 1);
        let dc = (2 * cell.col).abs_diff(self.width - 1);
        dr * dr + dc * dc
    }
}
