//! Whitespace-delimited text import.
//!
//! Each non-blank line becomes a row and each whitespace-separated token a
//! cell. Tokens are colored in first-seen order: the first distinct tokens
//! take the fixed palette in order, later ones get a fallback color. The null
//! tokens (`0` and `.` by default) become empty cells on a white background.
//!
//! Short lines are padded with blank cells so the result is always rectangular.

use crate::color::{hashed_hex, random_hex};
use crate::models::{Cell, Snapshot, DEFAULT_BACKGROUND};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Colors handed out, in order, to the first distinct tokens.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#3498db", "#e74c3c", "#2ecc71", "#f1c40f", "#9b59b6", "#1abc9c", "#e67e22", "#34495e",
    "#d35400", "#c0392b",
];

/// Tokens meaning "no character here".
pub const DEFAULT_NULL_TOKENS: [&str; 2] = ["0", "."];

/// Errors from text import
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The text had no non-blank lines
    #[error("import text contains no rows")]
    Empty,
}

/// How tokens beyond the fixed palette are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FallbackColors {
    /// Uniformly random RGB; differs between runs.
    #[default]
    Random,
    /// Derived from the token text; identical across runs.
    Hashed,
}

/// Settings for [`import_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub palette: Vec<String>,
    pub fallback: FallbackColors,
    pub null_tokens: Vec<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            fallback: FallbackColors::default(),
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ImportOptions {
    fn is_null(&self, token: &str) -> bool {
        self.null_tokens.iter().any(|t| t == token)
    }
}

/// A parsed grid plus the token colors that were assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imported {
    pub snapshot: Snapshot,
    /// Token to color, in first-seen order.
    pub token_colors: Vec<(String, String)>,
}

impl Imported {
    /// Color assigned to `token`, if it appeared in the input.
    pub fn color_of(&self, token: &str) -> Option<&str> {
        self.token_colors
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, c)| c.as_str())
    }
}

/// Incremental first-seen-wins token to color assignment.
struct TokenColors<'a> {
    options: &'a ImportOptions,
    rng: &'a mut fastrand::Rng,
    assigned: HashMap<String, String>,
    order: Vec<(String, String)>,
}

impl<'a> TokenColors<'a> {
    fn new(options: &'a ImportOptions, rng: &'a mut fastrand::Rng) -> Self {
        Self {
            options,
            rng,
            assigned: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn color_for(&mut self, token: &str) -> String {
        if let Some(color) = self.assigned.get(token) {
            return color.clone();
        }

        let color = match self.options.palette.get(self.order.len()) {
            Some(color) => color.clone(),
            None => match self.options.fallback {
                FallbackColors::Random => random_hex(self.rng),
                FallbackColors::Hashed => hashed_hex(token),
            },
        };

        self.assigned.insert(token.to_string(), color.clone());
        self.order.push((token.to_string(), color.clone()));
        color
    }
}

/// Split text into rows of tokens, dropping blank lines.
pub fn tokenize_rows(text: &str) -> Vec<Vec<&str>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split_whitespace().collect())
        .collect()
}

/// Parse delimited text into a grid, with fallback colors from a fresh random source.
///
/// # Examples
///
/// ```
/// use charmatrix::import::{import_text, ImportOptions};
///
/// let imported = import_text("A B\n0 A", &ImportOptions::default()).unwrap();
/// assert_eq!((imported.snapshot.rows, imported.snapshot.cols), (2, 2));
/// assert_eq!(imported.snapshot.grid[1][0].character, "");
/// ```
pub fn import_text(text: &str, options: &ImportOptions) -> Result<Imported, ImportError> {
    import_text_with_rng(text, options, &mut fastrand::Rng::new())
}

/// Parse delimited text into a grid, drawing random fallback colors from `rng`.
pub fn import_text_with_rng(
    text: &str,
    options: &ImportOptions,
    rng: &mut fastrand::Rng,
) -> Result<Imported, ImportError> {
    let rows = tokenize_rows(text);
    if rows.is_empty() {
        return Err(ImportError::Empty);
    }

    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut colors = TokenColors::new(options, rng);

    let mut grid = Vec::with_capacity(rows.len());
    for tokens in &rows {
        let mut row = Vec::with_capacity(cols);
        for c in 0..cols {
            let cell = match tokens.get(c) {
                Some(token) if !options.is_null(token) => Cell::new(*token, colors.color_for(token)),
                _ => Cell::new("", DEFAULT_BACKGROUND),
            };
            row.push(cell);
        }
        grid.push(row);
    }

    let token_colors = colors.order;
    if token_colors.len() > options.palette.len() {
        log::debug!(
            "import: {} distinct tokens, {} colored by {:?} fallback",
            token_colors.len(),
            token_colors.len() - options.palette.len(),
            options.fallback
        );
    }

    Ok(Imported {
        snapshot: Snapshot {
            rows: grid.len(),
            cols,
            grid,
        },
        token_colors,
    })
}
