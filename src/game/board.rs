//! Lawn grid and cell coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::PlantId;

/// A cell on the lawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Lane index (0 is the top lane).
    pub row: u8,
    /// Column index (0 is next to the house).
    pub col: u8,
}

impl Cell {
    /// Create a new cell coordinate.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Occupancy grid: each cell holds at most one plant.
#[derive(Debug, Clone)]
pub struct Board {
    /// Number of lanes.
    rows: u8,
    /// Number of columns.
    cols: u8,
    /// Cells stored in row-major order.
    cells: Vec<Option<PlantId>>,
}

impl Board {
    /// Create an empty board.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn new(rows: u8, cols: u8) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }

        Some(Self {
            rows,
            cols,
            cells: vec![None; usize::from(rows) * usize::from(cols)],
        })
    }

    /// Number of lanes.
    #[must_use]
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> u8 {
        self.cols
    }

    /// Check if a cell is on the board.
    #[must_use]
    pub const fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if self.in_bounds(cell) {
            Some(usize::from(cell.row) * usize::from(self.cols) + usize::from(cell.col))
        } else {
            None
        }
    }

    /// Plant registered in a cell.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<PlantId> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    /// Check if a cell is on the board and free.
    #[must_use]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.cells[i].is_none())
    }

    /// Register a plant in a free cell.
    ///
    /// Returns `false` (and changes nothing) if the cell is out of bounds
    /// or already occupied.
    pub fn occupy(&mut self, cell: Cell, plant: PlantId) -> bool {
        match self.index(cell) {
            Some(i) if self.cells[i].is_none() => {
                self.cells[i] = Some(plant);
                true
            }
            _ => false,
        }
    }

    /// Free a cell, returning the plant that was registered there.
    pub fn vacate(&mut self, cell: Cell) -> Option<PlantId> {
        self.index(cell).and_then(|i| self.cells[i].take())
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Remove every plant registration.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Iterate over all cells with their occupant.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Option<PlantId>)> + '_ {
        let cols = self.cols;
        self.cells.iter().enumerate().map(move |(i, occupant)| {
            #[allow(clippy::cast_possible_truncation)]
            let cell = Cell::new((i / usize::from(cols)) as u8, (i % usize::from(cols)) as u8);
            (cell, *occupant)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let board = Board::new(5, 9).unwrap();
        assert_eq!(board.rows(), 5);
        assert_eq!(board.cols(), 9);
        assert_eq!(board.occupied(), 0);
        assert!(Board::new(0, 9).is_none());
        assert!(Board::new(5, 0).is_none());
    }

    #[test]
    fn test_occupy_and_vacate() {
        let mut board = Board::new(5, 9).unwrap();
        let cell = Cell::new(2, 4);

        assert!(board.occupy(cell, PlantId(7)));
        assert_eq!(board.get(cell), Some(PlantId(7)));
        assert!(!board.is_free(cell));

        // Second plant is refused
        assert!(!board.occupy(cell, PlantId(8)));
        assert_eq!(board.get(cell), Some(PlantId(7)));

        assert_eq!(board.vacate(cell), Some(PlantId(7)));
        assert!(board.is_free(cell));
        assert_eq!(board.vacate(cell), None);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new(5, 9).unwrap();
        let cell = Cell::new(5, 0);
        assert!(!board.in_bounds(cell));
        assert!(!board.is_free(cell));
        assert!(!board.occupy(cell, PlantId(1)));
        assert_eq!(board.get(cell), None);
    }

    #[test]
    fn test_iter_row_major() {
        let mut board = Board::new(2, 3).unwrap();
        board.occupy(Cell::new(1, 2), PlantId(1));

        let cells: Vec<_> = board.iter().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0].0, Cell::new(0, 0));
        assert_eq!(cells[5], (Cell::new(1, 2), Some(PlantId(1))));
    }

    #[test]
    fn test_clear() {
        let mut board = Board::new(2, 2).unwrap();
        board.occupy(Cell::new(0, 0), PlantId(1));
        board.occupy(Cell::new(1, 1), PlantId(2));
        board.clear();
        assert_eq!(board.occupied(), 0);
    }
}
