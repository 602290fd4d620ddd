//! Charmatrix - Library for editing character/color grids
//!
//! This library provides functionality to:
//! - Hold a resizable grid of character/background-color cells
//! - Paint, erase and draw lines, rectangles and ellipses with bounded undo/redo
//! - Import whitespace-delimited text with inferred token colors
//! - Export grids as delimited text, JSON snapshots or PNG images

pub mod cli;
pub mod color;
pub mod config;
pub mod document;
pub mod export;
pub mod gesture;
pub mod grid;
pub mod history;
pub mod import;
pub mod models;
pub mod shapes;

#[cfg(feature = "wasm")]
pub mod wasm;
