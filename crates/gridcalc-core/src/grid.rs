use crate::cell::Cell;
use crate::coord::CellCoord;

/// A fixed-dimension grid of cells.
///
/// Dimensions are set at construction and every cell exists up front, so
/// lookups outside the grid are the only failure mode. Row-major dense
/// storage; a teaching-scale grid has no need for sparse chunking.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: u32, cols: u32) -> Self {
        let mut cells = Vec::with_capacity((rows as usize) * (cols as usize));
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new(row, col));
            }
        }
        Grid { rows, cols, cells }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    fn index(&self, coord: CellCoord) -> usize {
        (coord.row as usize) * (self.cols as usize) + (coord.col as usize)
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        if self.contains(coord) {
            Some(&self.cells[self.index(coord)])
        } else {
            None
        }
    }

    pub fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        if self.contains(coord) {
            let idx = self.index(coord);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Iterate over cells that differ from their default state
    pub fn modified_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_modified())
    }

    /// Iterate over every cell coordinate, row by row
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| CellCoord::new(row, col)))
    }

    /// Reset every cell to its default state
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
    }
}
