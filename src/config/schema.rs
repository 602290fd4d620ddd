//! Configuration schema types for `charmatrix.toml`
//!
//! Every section and field is optional; missing values take the defaults below.

use crate::color::parse_color;
use crate::export::{load_font, ExportError, RenderOptions, DEFAULT_CELL_SIZE};
use crate::history::DEFAULT_CAPACITY;
use crate::import::{FallbackColors, ImportOptions};
use crate::models::{Cell, DEFAULT_BACKGROUND};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Initial grid settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    /// Character every new cell starts with
    pub default_char: String,
    /// Background every new cell starts with
    pub default_color: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 15,
            cols: 20,
            default_char: String::new(),
            default_color: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

/// Undo/redo settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Snapshots kept per stack
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY }
    }
}

/// Text import settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Colors given to the first distinct tokens, in order
    pub palette: Vec<String>,
    /// Coloring for tokens past the end of the palette
    pub fallback: FallbackColors,
    /// Tokens imported as empty cells
    pub null_tokens: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let options = ImportOptions::default();
        Self {
            palette: options.palette,
            fallback: options.fallback,
            null_tokens: options.null_tokens,
        }
    }
}

impl ImportConfig {
    pub fn to_options(&self) -> ImportOptions {
        ImportOptions {
            palette: self.palette.clone(),
            fallback: self.fallback,
            null_tokens: self.null_tokens.clone(),
        }
    }
}

/// PNG export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Unscaled cell edge in pixels
    pub cell_size: u32,
    /// Integer output multiplier
    pub scale: u32,
    pub border_color: String,
    pub glyph_color: String,
    /// TrueType/OpenType font for glyphs; glyphs are skipped when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            scale: 1,
            border_color: "#000000".to_string(),
            glyph_color: "#FFFFFF".to_string(),
            font: None,
        }
    }
}

impl RenderConfig {
    /// Resolve colors and load the font.
    ///
    /// Colors are checked by [`CharmatrixConfig::validate`]; an unparseable one
    /// here falls back to the built-in default with a warning.
    pub fn to_render_options(&self) -> Result<RenderOptions, ExportError> {
        let defaults = RenderOptions::default();
        let font = match &self.font {
            Some(path) => Some(load_font(path).inspect_err(|e| {
                log::warn!("cannot load font {}: {}", path.display(), e);
            })?),
            None => None,
        };
        Ok(RenderOptions {
            cell_size: self.cell_size,
            scale: self.scale,
            border_color: color_or(&self.border_color, defaults.border_color),
            glyph_color: color_or(&self.glyph_color, defaults.glyph_color),
            font,
        })
    }
}

fn color_or(value: &str, fallback: Rgba<u8>) -> Rgba<u8> {
    parse_color(value).unwrap_or_else(|e| {
        log::warn!("render color '{}': {}", value, e);
        fallback
    })
}

/// Complete `charmatrix.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharmatrixConfig {
    pub grid: GridConfig,
    pub history: HistoryConfig,
    pub import: ImportConfig,
    pub render: RenderConfig,
}

/// Validation error for configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "charmatrix.toml: '{}' {}", self.field, self.message)
    }
}

impl CharmatrixConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if !Cell::is_valid_character(&self.grid.default_char) {
            errors.push(ConfigValidationError {
                field: "grid.default_char".to_string(),
                message: "must not contain whitespace or control characters".to_string(),
            });
        }
        check_color(&mut errors, "grid.default_color", &self.grid.default_color);

        if self.history.capacity == 0 {
            errors.push(ConfigValidationError {
                field: "history.capacity".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        for (i, color) in self.import.palette.iter().enumerate() {
            check_color(&mut errors, &format!("import.palette[{}]", i), color);
        }
        if self.import.null_tokens.iter().any(|t| t.trim().is_empty()) {
            errors.push(ConfigValidationError {
                field: "import.null_tokens".to_string(),
                message: "must not contain blank tokens".to_string(),
            });
        }

        if self.render.cell_size == 0 {
            errors.push(ConfigValidationError {
                field: "render.cell_size".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        if self.render.scale == 0 {
            errors.push(ConfigValidationError {
                field: "render.scale".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        check_color(&mut errors, "render.border_color", &self.render.border_color);
        check_color(&mut errors, "render.glyph_color", &self.render.glyph_color);

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn check_color(errors: &mut Vec<ConfigValidationError>, field: &str, value: &str) {
    if let Err(e) = parse_color(value) {
        errors.push(ConfigValidationError {
            field: field.to_string(),
            message: format!("is not a valid color: {}", e),
        });
    }
}
