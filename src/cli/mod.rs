//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod draw;
mod export;
mod import;
mod new;
mod show;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, CharmatrixConfig, CliOverrides};
use crate::document::Document;
use crate::export::{load_snapshot, ExportFormat};
use crate::import::FallbackColors;

pub use draw::DrawOp;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Charmatrix - Edit character/color grids from the command line
#[derive(Parser)]
#[command(name = "cmx")]
#[command(about = "Charmatrix - Create, import, edit and export character/color grids")]
#[command(version)]
pub struct Cli {
    /// Path to charmatrix.toml (default: search upward, then XDG config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a blank grid snapshot
    New {
        /// Output snapshot file (.json)
        output: PathBuf,

        /// Number of rows (default from config: 15)
        #[arg(long)]
        rows: Option<usize>,

        /// Number of columns (default from config: 20)
        #[arg(long)]
        cols: Option<usize>,
    },

    /// Import whitespace-delimited text into a grid snapshot
    Import {
        /// Input text file
        input: PathBuf,

        /// Output snapshot file (default: {input}.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Coloring for tokens past the fixed palette
        #[arg(long, value_enum)]
        fallback: Option<FallbackColors>,
    },

    /// Export a grid snapshot as text, JSON or PNG
    Export {
        /// Input snapshot file (.json)
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (default: inferred from the output extension)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Scale PNG output by integer factor
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: Option<u32>,

        /// Unscaled PNG cell size in pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=512))]
        cell_size: Option<u32>,

        /// Font used to draw characters into PNG cells
        #[arg(long)]
        font: Option<PathBuf>,

        /// Write JSON without indentation
        #[arg(long)]
        compact: bool,
    },

    /// Apply a sequence of edits to a grid snapshot
    ///
    /// Operations run in order through one editing session, so `undo` and
    /// `redo` refer to earlier operations in the same command:
    ///
    ///   paint:R,C  erase:R,C  line:R1,C1,R2,C2  rect:R1,C1,R2,C2
    ///   ellipse:R1,C1,R2,C2  resize:RxC  clear  undo  redo
    Draw {
        /// Snapshot file to edit (.json)
        input: PathBuf,

        /// Operations to apply, in order
        #[arg(required = true, value_name = "OP")]
        ops: Vec<DrawOp>,

        /// Character written by paint and shape operations
        #[arg(long = "char", default_value = "#")]
        character: String,

        /// Background color written by paint and shape operations
        #[arg(long, default_value = "#3498db")]
        color: String,

        /// Cells holding this character are never overwritten
        #[arg(long)]
        lock: Option<String>,

        /// Output file (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a grid snapshot as delimited text
    Show {
        /// Snapshot file to display (.json)
        input: PathBuf,
    },
}

/// Load config, printing any error.
fn resolve_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<CharmatrixConfig, ExitCode> {
    match load_config(path) {
        Ok((mut config, source)) => {
            log::debug!("configuration source: {:?}", source);
            overrides.apply_to(&mut config);
            Ok(config)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(ExitCode::from(EXIT_ERROR))
        }
    }
}

/// Open a snapshot file as a document with empty history, printing any error.
pub(crate) fn open_document(path: &Path, config: &CharmatrixConfig) -> Result<Document, ExitCode> {
    let snapshot = match load_snapshot(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: Cannot load '{}': {}", path.display(), e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    let mut doc = Document::from_config(config);
    match doc.load_snapshot(snapshot) {
        Ok(()) => {
            doc.clear_history();
            Ok(doc)
        }
        Err(e) => {
            eprintln!("Error: Cannot load '{}': {}", path.display(), e);
            Err(ExitCode::from(EXIT_ERROR))
        }
    }
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::New { output, rows, cols } => {
            let overrides = CliOverrides { rows, cols, ..Default::default() };
            match resolve_config(config_path, &overrides) {
                Ok(config) => new::run_new(&output, &config),
                Err(code) => code,
            }
        }
        Commands::Import { input, output, fallback } => {
            let overrides = CliOverrides { fallback, ..Default::default() };
            match resolve_config(config_path, &overrides) {
                Ok(config) => import::run_import(&input, output.as_deref(), &config),
                Err(code) => code,
            }
        }
        Commands::Export { input, output, format, scale, cell_size, font, compact } => {
            let overrides = CliOverrides { scale, cell_size, font, ..Default::default() };
            match resolve_config(config_path, &overrides) {
                Ok(config) => export::run_export(&input, &output, format, compact, &config),
                Err(code) => code,
            }
        }
        Commands::Draw { input, ops, character, color, lock, output } => {
            match resolve_config(config_path, &CliOverrides::default()) {
                Ok(config) => draw::run_draw(
                    &input,
                    &ops,
                    &character,
                    &color,
                    lock.as_deref(),
                    output.as_deref(),
                    &config,
                ),
                Err(code) => code,
            }
        }
        Commands::Show { input } => match resolve_config(config_path, &CliOverrides::default()) {
            Ok(config) => show::run_show(&input, &config),
            Err(code) => code,
        },
    }
}
