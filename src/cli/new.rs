//! New command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CharmatrixConfig;
use crate::document::Document;
use crate::export::{save_snapshot, ExportOptions};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the new command - write a blank grid sized from config
pub fn run_new(output: &Path, config: &CharmatrixConfig) -> ExitCode {
    let doc = Document::from_config(config);
    match save_snapshot(&doc.snapshot(), output, &ExportOptions::default()) {
        Ok(()) => {
            eprintln!("Wrote: {} ({}x{})", output.display(), doc.rows(), doc.cols());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
