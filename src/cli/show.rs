//! Show command implementation (terminal display)

use std::path::Path;
use std::process::ExitCode;

use crate::config::CharmatrixConfig;
use crate::export::to_delimited_text;

use super::{open_document, EXIT_SUCCESS};

/// Execute the show command - print dimensions then the delimited text
pub fn run_show(input: &Path, config: &CharmatrixConfig) -> ExitCode {
    let doc = match open_document(input, config) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    println!("{}x{}", doc.rows(), doc.cols());
    let text = to_delimited_text(doc.grid());
    if !text.is_empty() {
        println!("{}", text);
    }
    ExitCode::from(EXIT_SUCCESS)
}
