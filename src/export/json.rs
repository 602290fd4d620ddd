//! JSON snapshot files.
//!
//! # Format
//!
//! ```json
//! {
//!   "rows": 2,
//!   "cols": 2,
//!   "grid": [
//!     [{"character": "A", "backgroundColor": "#3498db"}, {"character": "", "backgroundColor": "#FFFFFF"}],
//!     [{"character": "", "backgroundColor": "#FFFFFF"}, {"character": "B", "backgroundColor": "#e74c3c"}]
//!   ]
//! }
//! ```
//!
//! Loading validates that `grid` has exactly `rows` rows of exactly `cols`
//! cells; a file that fails validation is rejected as a whole.

use crate::export::{ensure_parent_dir, ExportOptions, Exporter, Result};
use crate::grid::Grid;
use crate::models::{Cell, Snapshot};
use std::path::Path;
use thiserror::Error;

/// A snapshot file that could not be read or is structurally invalid.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot declares {expected} rows but grid has {found}")]
    RowCount { expected: usize, found: usize },
    #[error("snapshot declares {expected} columns but row {row} has {found}")]
    ColumnCount { row: usize, expected: usize, found: usize },
    #[error("cell ({row}, {col}) has character {character:?} with whitespace or control characters")]
    InvalidCharacter { row: usize, col: usize, character: String },
}

/// Check that a snapshot's grid matches its declared dimensions and that
/// every character is storable.
pub fn validate_snapshot(snapshot: &Snapshot) -> std::result::Result<(), FormatError> {
    if snapshot.grid.len() != snapshot.rows {
        return Err(FormatError::RowCount {
            expected: snapshot.rows,
            found: snapshot.grid.len(),
        });
    }
    for (row, cells) in snapshot.grid.iter().enumerate() {
        if cells.len() != snapshot.cols {
            return Err(FormatError::ColumnCount {
                row,
                expected: snapshot.cols,
                found: cells.len(),
            });
        }
        if let Some((col, cell)) = cells.iter().enumerate().find(|(_, c)| !Cell::is_valid_character(&c.character)) {
            return Err(FormatError::InvalidCharacter { row, col, character: cell.character.clone() });
        }
    }
    Ok(())
}

/// Parse and validate a snapshot from JSON text.
pub fn parse_snapshot(json: &str) -> std::result::Result<Snapshot, FormatError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

/// Read and validate a snapshot file.
pub fn load_snapshot(path: &Path) -> std::result::Result<Snapshot, FormatError> {
    let content = std::fs::read_to_string(path)?;
    parse_snapshot(&content).inspect_err(|e| {
        log::warn!("rejected snapshot {}: {}", path.display(), e);
    })
}

/// Serialize a snapshot to JSON text.
pub fn snapshot_to_json(snapshot: &Snapshot, options: &ExportOptions) -> Result<String> {
    let json = if options.pretty {
        serde_json::to_string_pretty(snapshot)?
    } else {
        serde_json::to_string(snapshot)?
    };
    Ok(json)
}

/// Write a snapshot file, creating parent directories as needed.
pub fn save_snapshot(snapshot: &Snapshot, path: &Path, options: &ExportOptions) -> Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, snapshot_to_json(snapshot, options)?)?;
    Ok(())
}

/// JSON snapshot exporter.
#[derive(Debug, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }

    /// Export the grid to a JSON string.
    pub fn export_to_string(&self, grid: &Grid, options: &ExportOptions) -> Result<String> {
        snapshot_to_json(&grid.snapshot(), options)
    }
}

impl Exporter for JsonExporter {
    fn export(&self, grid: &Grid, output_path: &Path, options: &ExportOptions) -> Result<()> {
        save_snapshot(&grid.snapshot(), output_path, options)
    }

    fn format_name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
