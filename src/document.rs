//! A grid and its history, edited as one unit.
//!
//! Every mutator on [`Document`] records exactly one undo snapshot of the
//! pre-edit state before touching the grid. Undo and redo move snapshots
//! between the stacks instead. Callers never reach the grid mutably except
//! through these methods or a [`Gesture`](crate::gesture::Gesture).

use crate::config::CharmatrixConfig;
use crate::export::{load_snapshot, validate_snapshot, FormatError};
use crate::grid::Grid;
use crate::history::History;
use crate::import::{import_text_with_rng, ImportError, ImportOptions, Imported};
use crate::models::{Coord, Snapshot, DEFAULT_BACKGROUND};
use crate::shapes::{rasterize_within, ShapeKind};
use std::path::Path;

/// The active character, color and lock character for an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    pub character: String,
    pub color: String,
    /// Cells holding this character resist writes.
    pub lock: Option<String>,
}

impl Brush {
    pub fn new(character: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            color: color.into(),
            lock: None,
        }
    }

    pub fn with_lock(mut self, lock: impl Into<String>) -> Self {
        self.lock = Some(lock.into());
        self
    }

    pub fn lock(&self) -> Option<&str> {
        self.lock.as_deref()
    }

    /// The brush that erases: no character on the default background, same lock.
    pub fn eraser(&self) -> Brush {
        Brush {
            character: String::new(),
            color: DEFAULT_BACKGROUND.to_string(),
            lock: self.lock.clone(),
        }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::new("", DEFAULT_BACKGROUND)
    }
}

/// An editable grid with bounded undo/redo.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    grid: Grid,
    history: History,
}

impl Document {
    /// A blank `rows x cols` document with the default history capacity.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_parts(Grid::new(rows, cols, "", DEFAULT_BACKGROUND), History::new())
    }

    pub fn with_parts(grid: Grid, history: History) -> Self {
        Self { grid, history }
    }

    /// A fresh document sized and filled per the `[grid]` and `[history]` sections.
    pub fn from_config(config: &CharmatrixConfig) -> Self {
        let grid = Grid::new(
            config.grid.rows,
            config.grid.cols,
            config.grid.default_char.as_str(),
            config.grid.default_color.as_str(),
        );
        Self::with_parts(grid, History::with_capacity(config.history.capacity))
    }

    /// A document whose grid starts as `snapshot`, with empty history.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, FormatError> {
        validate_snapshot(&snapshot)?;
        let mut grid = Grid::default();
        grid.restore(snapshot);
        Ok(Self::with_parts(grid, History::new()))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.grid.snapshot()
    }

    /// Push the pre-edit snapshot. Called once per user-visible action.
    pub(crate) fn record(&mut self) {
        self.history.push_state(&self.grid);
    }

    /// Write one cell without recording history.
    pub(crate) fn write(&mut self, at: Coord, brush: &Brush) -> bool {
        self.grid.set_cell(at.0, at.1, &brush.character, &brush.color, brush.lock())
    }

    /// Write every coordinate without recording history, returning those written.
    pub(crate) fn write_all<I>(&mut self, coords: I, brush: &Brush) -> Vec<Coord>
    where
        I: IntoIterator<Item = Coord>,
    {
        self.grid.fill_coords(coords, &brush.character, &brush.color, brush.lock())
    }

    /// Paint one cell.
    ///
    /// Presses outside the grid are ignored and record nothing. A press on a
    /// locked cell still records an undo frame and returns `false`.
    pub fn paint(&mut self, at: Coord, brush: &Brush) -> bool {
        if !self.grid.contains(at.0, at.1) {
            return false;
        }
        self.record();
        self.write(at, brush)
    }

    /// Erase one cell to an empty character on the default background.
    pub fn erase(&mut self, at: Coord, lock: Option<&str>) -> bool {
        let brush = Brush {
            lock: lock.map(str::to_string),
            ..Brush::default()
        };
        self.paint(at, &brush)
    }

    /// Rasterize a shape and write it as a single edit, returning the cells written.
    ///
    /// Only the part of the shape inside the grid is visited, so far-off corners are cheap.
    pub fn draw_shape(&mut self, kind: ShapeKind, start: Coord, end: Coord, brush: &Brush) -> Vec<Coord> {
        self.record();
        let cells = rasterize_within(kind, start, end, self.grid.clip());
        let mut written = self.write_all(cells, brush);
        written.sort_unstable();
        written
    }

    /// Resize, keeping the overlapping top-left region.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.record();
        self.grid.resize(rows, cols);
    }

    /// Reset every cell to the default value.
    pub fn clear(&mut self) {
        self.record();
        self.grid.reinitialize();
    }

    /// Replace the grid with parsed text.
    ///
    /// Text with no rows is rejected before anything is recorded.
    pub fn import_text(&mut self, text: &str, options: &ImportOptions) -> Result<Imported, ImportError> {
        self.import_text_with_rng(text, options, &mut fastrand::Rng::new())
    }

    pub fn import_text_with_rng(
        &mut self,
        text: &str,
        options: &ImportOptions,
        rng: &mut fastrand::Rng,
    ) -> Result<Imported, ImportError> {
        let imported = import_text_with_rng(text, options, rng)?;
        self.record();
        self.grid.restore(imported.snapshot.clone());
        Ok(imported)
    }

    /// Replace the grid with a snapshot after validating its shape.
    ///
    /// An invalid snapshot leaves the document and its history untouched.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<(), FormatError> {
        validate_snapshot(&snapshot)?;
        self.record();
        self.grid.restore(snapshot);
        Ok(())
    }

    /// Read, validate and load a snapshot file.
    pub fn load_file(&mut self, path: &Path) -> Result<(), FormatError> {
        let snapshot = load_snapshot(path)?;
        self.load_snapshot(snapshot)
    }

    /// Drop every undo and redo frame, keeping the grid.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.grid)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.grid)
    }
}
