//! Charmatrix - Command-line editor for character/color grids

use std::process::ExitCode;

use charmatrix::cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    cli::run()
}
