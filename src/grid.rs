//! The live character/color grid and its cell-mutation rules.

use crate::models::{Cell, Coord, Snapshot};
use crate::shapes::Clip;
use thiserror::Error;

/// Why a cell write was refused.
///
/// Bounds and lock rejections are expected during normal editing (drags
/// routinely leave the grid, locked glyphs resist paint), so [`Grid::set_cell`]
/// reports every rejection as a plain `false`. [`Grid::try_set_cell`] keeps the reason for callers that want it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteRejected {
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: i32,
        col: i32,
        rows: usize,
        cols: usize,
    },
    #[error("cell ({row}, {col}) holds the locked character '{lock}'")]
    Locked { row: usize, col: usize, lock: String },
    #[error("character {character:?} contains whitespace or control characters")]
    InvalidCharacter { character: String },
}

/// A rectangular matrix of [`Cell`]s.
///
/// Every row always has exactly `cols` cells. Resizing, restoring and
/// reinitializing replace the whole matrix, so no operation can leave it jagged.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Cell>>,
    default_cell: Cell,
}

impl Grid {
    /// Allocate a `rows x cols` grid with every cell set to the default.
    ///
    /// Zero dimensions are legal and produce an empty grid.
    pub fn new(
        rows: usize,
        cols: usize,
        default_char: impl Into<String>,
        default_color: impl Into<String>,
    ) -> Self {
        Self::with_default(rows, cols, Cell::new(default_char, default_color))
    }

    /// Allocate a grid filled with `default_cell`.
    pub fn with_default(rows: usize, cols: usize, default_cell: Cell) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![default_cell.clone(); cols]; rows],
            default_cell,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The value new cells receive on initialization and growth.
    pub fn default_cell(&self) -> &Cell {
        &self.default_cell
    }

    /// Returns true if `(row, col)` lies inside the grid.
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Rasterization window covering exactly this grid.
    pub fn clip(&self) -> Clip {
        Clip::grid(self.rows, self.cols)
    }

    /// Direct cell lookup.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is out of bounds; callers check bounds first.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row][col]
    }

    /// Bounds-checked cell lookup.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Iterate over rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|r| r.as_slice())
    }

    /// Reset every cell to the default value, keeping the dimensions.
    pub fn reinitialize(&mut self) {
        self.cells = vec![vec![self.default_cell.clone(); self.cols]; self.rows];
    }

    /// Replace the grid with one of the requested dimensions.
    ///
    /// Cells in the overlapping top-left region are copied over; all others
    /// get the default value. The previous matrix is dropped, never mutated.
    pub fn resize(&mut self, new_rows: usize, new_cols: usize) {
        let mut cells = Vec::with_capacity(new_rows);
        for r in 0..new_rows {
            let mut row = Vec::with_capacity(new_cols);
            for c in 0..new_cols {
                if r < self.rows && c < self.cols {
                    row.push(self.cells[r][c].clone());
                } else {
                    row.push(self.default_cell.clone());
                }
            }
            cells.push(row);
        }

        log::debug!("resize {}x{} -> {}x{}", self.rows, self.cols, new_rows, new_cols);
        self.cells = cells;
        self.rows = new_rows;
        self.cols = new_cols;
    }

    /// Write a character and color into one cell, reporting why a write was refused.
    ///
    /// If `lock` is a non-empty string and the cell's current character equals
    /// it, the write is rejected and the cell is left unchanged. Characters
    /// failing [`Cell::is_valid_character`] are rejected too.
    pub fn try_set_cell(
        &mut self,
        row: i32,
        col: i32,
        character: &str,
        color: &str,
        lock: Option<&str>,
    ) -> Result<(), WriteRejected> {
        if !self.contains(row, col) {
            return Err(WriteRejected::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }

        if !Cell::is_valid_character(character) {
            return Err(WriteRejected::InvalidCharacter { character: character.to_string() });
        }

        let (r, c) = (row as usize, col as usize);
        let cell = &mut self.cells[r][c];
        if let Some(lock) = lock.filter(|l| !l.is_empty()) {
            if cell.character == lock {
                return Err(WriteRejected::Locked { row: r, col: c, lock: lock.to_string() });
            }
        }

        cell.character.clear();
        cell.character.push_str(character);
        cell.background_color.clear();
        cell.background_color.push_str(color);
        Ok(())
    }

    /// Write a character and color into one cell.
    ///
    /// Returns `false` if the coordinate is out of bounds, the cell holds the
    /// lock character, or the character is not storable; `true` if the cell
    /// now holds exactly the new values.
    pub fn set_cell(
        &mut self,
        row: i32,
        col: i32,
        character: &str,
        color: &str,
        lock: Option<&str>,
    ) -> bool {
        self.try_set_cell(row, col, character, color, lock).is_ok()
    }

    /// Write one character and color into every coordinate, returning those actually written.
    pub fn fill_coords<I>(&mut self, coords: I, character: &str, color: &str, lock: Option<&str>) -> Vec<Coord>
    where
        I: IntoIterator<Item = Coord>,
    {
        coords
            .into_iter()
            .filter(|&(r, c)| self.set_cell(r, c, character, color, lock))
            .collect()
    }

    /// Deep copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.rows,
            cols: self.cols,
            grid: self.cells.clone(),
        }
    }

    /// Make `snapshot` the live state, taking ownership of its cells.
    ///
    /// The snapshot must be rectangular; loaders validate before calling this.
    pub fn restore(&mut self, snapshot: Snapshot) {
        debug_assert!(snapshot.is_rectangular());
        self.rows = snapshot.rows;
        self.cols = snapshot.cols;
        self.cells = snapshot.grid;
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::with_default(0, 0, Cell::blank())
    }
}
