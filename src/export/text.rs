//! Delimited text export.
//!
//! One line per row, cells separated by single spaces. Empty cells are written
//! as `0` so the output re-imports with the same dimensions.

use crate::export::{ensure_parent_dir, ExportOptions, Exporter, Result};
use crate::grid::Grid;
use std::path::Path;

/// Token written for cells without a character.
pub const EMPTY_TOKEN: &str = "0";

/// Render the grid as delimited text.
///
/// # Examples
///
/// ```
/// use charmatrix::export::to_delimited_text;
/// use charmatrix::grid::Grid;
///
/// let mut grid = Grid::new(2, 2, "", "#FFFFFF");
/// grid.set_cell(0, 1, "X", "#000000", None);
/// assert_eq!(to_delimited_text(&grid), "0 X\n0 0");
/// ```
pub fn to_delimited_text(grid: &Grid) -> String {
    grid.iter_rows()
        .map(|row| {
            row.iter()
                .map(|cell| if cell.is_empty() { EMPTY_TOKEN } else { cell.character.as_str() })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Delimited text exporter.
#[derive(Debug, Default)]
pub struct TextExporter;

impl TextExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for TextExporter {
    fn export(&self, grid: &Grid, output_path: &Path, _options: &ExportOptions) -> Result<()> {
        ensure_parent_dir(output_path)?;
        let mut content = to_delimited_text(grid);
        content.push('\n');
        std::fs::write(output_path, content)?;
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "text"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}
