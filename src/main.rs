//! Free gift discount function runner
//!
//! Reads a function input document and writes the function result to stdout.

use std::{io, process::ExitCode};

use tracing::error;

use crate::cli::{CliConfig, logging::init_subscriber};

mod cli;

/// Runner entry point
pub fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = CliConfig::load().unwrap_or_else(|err| err.exit());

    if let Err(err) = init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {err}");
        }

        return ExitCode::FAILURE;
    }

    match config.execute(io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "free gift function failed");

            ExitCode::FAILURE
        }
    }
}
