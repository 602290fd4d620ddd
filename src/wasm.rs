//! WASM API module for browser/JS interop
//!
//! Exposes a [`GridEditor`] that a browser canvas drives with pointer
//! gestures. Errors come back as plain strings so the bindings work the same
//! under native tests.

use wasm_bindgen::prelude::*;

use crate::document::{Brush, Document};
use crate::export::{encode_png, parse_snapshot, render_grid, snapshot_to_json, to_delimited_text, ExportOptions, RenderOptions};
use crate::gesture::{Gesture, Tool};
use crate::import::ImportOptions;
use crate::shapes::ShapeKind;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn parse_tool(name: &str) -> Option<Tool> {
    match name {
        "pen" => Some(Tool::Pen),
        "eraser" => Some(Tool::Eraser),
        "line" => Some(Tool::Line),
        "rect" | "rectangle" => Some(Tool::Rectangle),
        "ellipse" | "circle" => Some(Tool::Ellipse),
        _ => None,
    }
}

fn brush(character: &str, color: &str, lock: &str) -> Brush {
    let brush = Brush::new(character, color);
    if lock.is_empty() {
        brush
    } else {
        brush.with_lock(lock)
    }
}

/// Flatten coordinates to `[r0, c0, r1, c1, ...]` for JS.
fn flatten(coords: &[(i32, i32)]) -> Vec<i32> {
    coords.iter().flat_map(|&(r, c)| [r, c]).collect()
}

/// A document plus the gesture currently in progress.
#[wasm_bindgen]
pub struct GridEditor {
    doc: Document,
    gesture: Option<Gesture>,
}

#[wasm_bindgen]
impl GridEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(rows: usize, cols: usize) -> GridEditor {
        GridEditor { doc: Document::new(rows, cols), gesture: None }
    }

    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> usize {
        self.doc.rows()
    }

    #[wasm_bindgen(getter)]
    pub fn cols(&self) -> usize {
        self.doc.cols()
    }

    /// Character at a cell, or empty if out of bounds
    pub fn character_at(&self, row: usize, col: usize) -> String {
        self.doc.grid().get(row, col).map(|c| c.character.clone()).unwrap_or_default()
    }

    /// Background color at a cell, or empty if out of bounds
    pub fn color_at(&self, row: usize, col: usize) -> String {
        self.doc.grid().get(row, col).map(|c| c.background_color.clone()).unwrap_or_default()
    }

    /// Start a pointer gesture. Returns false if the tool is unknown or the press is outside the grid.
    pub fn begin_gesture(
        &mut self,
        tool: &str,
        row: i32,
        col: i32,
        character: &str,
        color: &str,
        lock: &str,
    ) -> bool {
        let Some(tool) = parse_tool(tool) else {
            return false;
        };
        if let Some(previous) = self.gesture.take() {
            previous.cancel();
        }
        self.gesture = Gesture::begin(&mut self.doc, tool, brush(character, color, lock), (row, col));
        self.gesture.is_some()
    }

    pub fn drag(&mut self, row: i32, col: i32) -> bool {
        match self.gesture.as_mut() {
            Some(g) => g.drag(&mut self.doc, (row, col)),
            None => false,
        }
    }

    /// Cells the current gesture would cover if released at `(row, col)`, flattened
    pub fn preview(&self, row: i32, col: i32) -> Vec<i32> {
        match &self.gesture {
            Some(g) => flatten(&g.preview(self.doc.grid(), (row, col))),
            None => Vec::new(),
        }
    }

    /// Finish the current gesture, returning the written cells flattened
    pub fn commit(&mut self, row: i32, col: i32) -> Vec<i32> {
        match self.gesture.take() {
            Some(g) => flatten(&g.commit(&mut self.doc, (row, col))),
            None => Vec::new(),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(g) = self.gesture.take() {
            g.cancel();
        }
    }

    /// Draw a whole shape in one call ("line", "rect", "ellipse")
    pub fn draw_shape(
        &mut self,
        kind: &str,
        r1: i32,
        c1: i32,
        r2: i32,
        c2: i32,
        character: &str,
        color: &str,
        lock: &str,
    ) -> Vec<i32> {
        let kind = match kind {
            "line" => ShapeKind::Line,
            "rect" | "rectangle" => ShapeKind::Rectangle,
            "ellipse" | "circle" => ShapeKind::Ellipse,
            _ => return Vec::new(),
        };
        flatten(&self.doc.draw_shape(kind, (r1, c1), (r2, c2), &brush(character, color, lock)))
    }

    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.doc.resize(rows, cols);
    }

    pub fn clear(&mut self) {
        self.doc.clear();
    }

    pub fn undo(&mut self) -> bool {
        self.doc.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.doc.redo()
    }

    /// Import delimited text. Returns an error message, or `undefined` on success.
    pub fn import_text(&mut self, text: &str) -> Option<String> {
        self.doc.import_text(text, &ImportOptions::default()).err().map(|e| e.to_string())
    }

    /// Load a JSON snapshot. Returns an error message, or `undefined` on success.
    pub fn load_json(&mut self, json: &str) -> Option<String> {
        let snapshot = match parse_snapshot(json) {
            Ok(s) => s,
            Err(e) => return Some(e.to_string()),
        };
        self.doc.load_snapshot(snapshot).err().map(|e| e.to_string())
    }

    pub fn to_json(&self) -> String {
        snapshot_to_json(&self.doc.snapshot(), &ExportOptions { pretty: false }).unwrap_or_default()
    }

    pub fn to_text(&self) -> String {
        to_delimited_text(self.doc.grid())
    }

    /// Render to PNG bytes with the built-in font. Empty if the image is too large.
    pub fn to_png(&self, cell_size: u32, scale: u32) -> Vec<u8> {
        let options = RenderOptions { cell_size, scale, ..Default::default() };
        render_grid(self.doc.grid(), &options)
            .and_then(|image| encode_png(&image))
            .unwrap_or_default()
    }
}
