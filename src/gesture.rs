//! Pointer gestures: press, drag, release as one undoable edit.
//!
//! A gesture records its undo snapshot when it begins. Pen and eraser
//! gestures write each cell the pointer visits; shape gestures only preview
//! while dragging and write the rasterized shape on commit.
//!
//! Cancelling keeps the recorded snapshot as a no-op undo frame. Cells a pen
//! or eraser already wrote stay written; a cancelled shape writes nothing.

use crate::document::{Brush, Document};
use crate::grid::Grid;
use crate::models::Coord;
use crate::shapes::{rasterize_within, ShapeKind};
use serde::{Deserialize, Serialize};

/// Editing tool driving a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
    Line,
    #[serde(alias = "rect")]
    Rectangle,
    #[serde(alias = "circle")]
    Ellipse,
}

impl Tool {
    /// The shape this tool rasterizes, or `None` for freehand tools.
    pub fn shape(self) -> Option<ShapeKind> {
        match self {
            Tool::Pen | Tool::Eraser => None,
            Tool::Line => Some(ShapeKind::Line),
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Ellipse => Some(ShapeKind::Ellipse),
        }
    }
}

/// An in-progress gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gesture {
    tool: Tool,
    brush: Brush,
    start: Coord,
    last: Coord,
}

impl Gesture {
    /// Start a gesture at `at`.
    ///
    /// Returns `None` without recording anything if `at` is outside the grid.
    pub fn begin(doc: &mut Document, tool: Tool, brush: Brush, at: Coord) -> Option<Gesture> {
        if !doc.grid().contains(at.0, at.1) {
            return None;
        }
        doc.record();

        let brush = match tool {
            Tool::Eraser => brush.eraser(),
            _ => brush,
        };
        let gesture = Gesture { tool, brush, start: at, last: at };
        if tool.shape().is_none() {
            doc.write(at, &gesture.brush);
        }
        Some(gesture)
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    /// Move the pointer to `at`.
    ///
    /// Freehand tools write the cell under the pointer and return whether it
    /// changed. Shape tools only remember the position and return `false`.
    pub fn drag(&mut self, doc: &mut Document, at: Coord) -> bool {
        self.last = at;
        match self.tool.shape() {
            None => doc.write(at, &self.brush),
            Some(_) => false,
        }
    }

    /// The in-bounds cells a shape ending at `at` would cover.
    ///
    /// Never mutates anything. Freehand tools preview just the cell under the pointer.
    pub fn preview(&self, grid: &Grid, at: Coord) -> Vec<Coord> {
        let mut cells: Vec<Coord> = match self.tool.shape() {
            Some(kind) => rasterize_within(kind, self.start, at, grid.clip()).into_iter().collect(),
            None => vec![at],
        };
        cells.retain(|&(r, c)| grid.contains(r, c));
        cells.sort_unstable();
        cells
    }

    /// Release the pointer at `end`, returning the cells written by this step.
    ///
    /// Out-of-grid endpoints are allowed; shapes are clipped to the grid.
    pub fn commit(self, doc: &mut Document, end: Coord) -> Vec<Coord> {
        let mut written = match self.tool.shape() {
            Some(kind) => {
                let cells = rasterize_within(kind, self.start, end, doc.grid().clip());
                doc.write_all(cells, &self.brush)
            }
            None => doc.write_all([end], &self.brush),
        };
        written.sort_unstable();
        log::debug!("{:?} gesture committed, {} cells written", self.tool, written.len());
        written
    }

    /// Abandon the gesture, e.g. when the pointer leaves the canvas.
    pub fn cancel(self) {
        log::debug!("{:?} gesture cancelled at {:?}", self.tool, self.last);
    }
}
