//! Import command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CharmatrixConfig;
use crate::document::Document;
use crate::export::{save_snapshot, ExportOptions};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the import command
pub fn run_import(input: &Path, output: Option<&Path>, config: &CharmatrixConfig) -> ExitCode {
    let text = match std::fs::read_to_string(input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut doc = Document::from_config(config);
    let imported = match doc.import_text(&text, &config.import.to_options()) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let output_path = output.map(Path::to_path_buf).unwrap_or_else(|| input.with_extension("json"));
    if let Err(e) = save_snapshot(&doc.snapshot(), &output_path, &ExportOptions::default()) {
        eprintln!("Error: Failed to write '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!(
        "Imported: {} ({}x{}, {} tokens)",
        output_path.display(),
        doc.rows(),
        doc.cols(),
        imported.token_colors.len()
    );
    let palette_len = config.import.palette.len();
    if imported.token_colors.len() > palette_len {
        println!(
            "  {} tokens colored by {:?} fallback",
            imported.token_colors.len() - palette_len,
            config.import.fallback
        );
    }

    ExitCode::from(EXIT_SUCCESS)
}
