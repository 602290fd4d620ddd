//! Export formats for grids.
//!
//! # Supported Formats
//!
//! - **Text**: one line per row, space-separated characters, `0` for empty cells
//! - **JSON**: the flat `{rows, cols, grid}` snapshot, loadable again
//! - **PNG**: rasterized cells with backgrounds, borders and centered glyphs
//!
//! # Example
//!
//! ```no_run
//! use charmatrix::export::{ExportOptions, Exporter, TextExporter};
//! use charmatrix::grid::Grid;
//! use std::path::Path;
//!
//! let grid = Grid::new(2, 2, "", "#FFFFFF");
//! TextExporter::new().export(&grid, Path::new("grid.txt"), &ExportOptions::default())?;
//! # Ok::<(), charmatrix::export::ExportError>(())
//! ```

pub mod json;
pub mod png;
pub mod text;

pub use json::*;
pub use png::*;
pub use text::*;

use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Common error type for export operations.
#[derive(Debug)]
pub enum ExportError {
    /// IO error during file writing
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
    /// Image encoding error
    Image(image::ImageError),
    /// Font file could not be parsed
    Font(String),
    /// Rendered image would exceed the pixel budget
    TooLarge { width: u64, height: u64, limit: u64 },
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {}", e),
            ExportError::Serialization(e) => write!(f, "Serialization error: {}", e),
            ExportError::Image(e) => write!(f, "Image error: {}", e),
            ExportError::Font(e) => write!(f, "Font error: {}", e),
            ExportError::TooLarge { width, height, limit } => write!(
                f,
                "Image too large: {}x{} pixels exceeds the limit of {} pixels",
                width, height, limit
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Image(e) => Some(e),
            ExportError::Serialization(_) | ExportError::Font(_) | ExportError::TooLarge { .. } => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialization(e.to_string())
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Options for export operations.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Pretty print output (with indentation)
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Text,
    Json,
    Png,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("txt") => ExportFormat::Text,
            Some("png") => ExportFormat::Png,
            _ => ExportFormat::Json,
        }
    }
}

/// Trait for export format implementations.
pub trait Exporter {
    /// Export the grid to the specified path.
    fn export(&self, grid: &Grid, output_path: &Path, options: &ExportOptions) -> Result<()>;

    /// Get the format name for this exporter.
    fn format_name(&self) -> &'static str;

    /// Get the default file extension for this format.
    fn extension(&self) -> &'static str;
}

/// Create the parent directory of `path` if it is missing.
pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
