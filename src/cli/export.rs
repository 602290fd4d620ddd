//! Export command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CharmatrixConfig;
use crate::export::{ExportFormat, ExportOptions, Exporter, JsonExporter, PngExporter, TextExporter};

use super::{open_document, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the export command
pub fn run_export(
    input: &Path,
    output: &Path,
    format: Option<ExportFormat>,
    compact: bool,
    config: &CharmatrixConfig,
) -> ExitCode {
    let doc = match open_document(input, config) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let format = format.unwrap_or_else(|| ExportFormat::from_path(output));
    let exporter: Box<dyn Exporter> = match format {
        ExportFormat::Text => Box::new(TextExporter::new()),
        ExportFormat::Json => Box::new(JsonExporter::new()),
        ExportFormat::Png => match config.render.to_render_options() {
            Ok(render) => Box::new(PngExporter::new(render)),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };

    let options = ExportOptions { pretty: !compact };
    match exporter.export(doc.grid(), output, &options) {
        Ok(()) => {
            eprintln!("Wrote: {} ({})", output.display(), exporter.format_name());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
