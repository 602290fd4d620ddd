//! Data models for grid cells and snapshots

use serde::{Deserialize, Serialize};

/// A grid coordinate as `(row, col)`.
///
/// Signed so that drag gestures crossing the top or left edge can still be
/// expressed; writers filter out-of-bounds coordinates.
pub type Coord = (i32, i32);

/// Background color of a freshly created or erased cell.
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// One grid position: a displayable character and a background color.
///
/// An empty `character` means nothing is drawn on top of the background.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(alias = "char")]
    pub character: String,
    #[serde(alias = "bg")]
    pub background_color: String,
}

impl Cell {
    pub fn new(character: impl Into<String>, background_color: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            background_color: background_color.into(),
        }
    }

    /// An erased cell: no character on a white background.
    pub fn blank() -> Self {
        Self::new("", DEFAULT_BACKGROUND)
    }

    /// Returns true if `character` can be stored in a cell.
    ///
    /// Whitespace and control characters are refused; they would split or
    /// corrupt the token in delimited text export.
    pub fn is_valid_character(character: &str) -> bool {
        !character.chars().any(|c| c.is_whitespace() || c.is_control())
    }

    /// Returns true if no character is drawn in this cell.
    pub fn is_empty(&self) -> bool {
        self.character.is_empty()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

/// A full deep copy of a grid and its dimensions.
///
/// Used both for undo/redo history and as the on-disk snapshot format:
/// `{ "rows": n, "cols": m, "grid": [[{ "character": .., "backgroundColor": .. }]] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    pub grid: Vec<Vec<Cell>>,
}

impl Snapshot {
    /// Build a snapshot of `rows x cols` cells all equal to `fill`.
    pub fn filled(rows: usize, cols: usize, fill: &Cell) -> Self {
        Self {
            rows,
            cols,
            grid: vec![vec![fill.clone(); cols]; rows],
        }
    }

    /// Returns true if `grid` has exactly `rows` rows of exactly `cols` cells.
    pub fn is_rectangular(&self) -> bool {
        self.grid.len() == self.rows && self.grid.iter().all(|row| row.len() == self.cols)
    }
}
