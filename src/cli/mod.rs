//! Command line configuration and execution.

use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

use clap::Parser;
use thiserror::Error;
use tracing::{debug, instrument};

use gwp::{
    cart::{CartError, CartSnapshot},
    config::resolve,
    function::{FunctionInput, run},
    report::{Report, ReportError},
};

use crate::cli::logging::LoggingConfig;

pub(crate) mod logging;

/// Errors raised while running the function from the command line.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input document is not valid function input.
    #[error("invalid function input: {0}")]
    Json(#[from] serde_json::Error),

    /// The input cart could not be converted.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The report could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Function result document.
    Json,

    /// Human-readable table and decision summary.
    Report,
}

/// Free gift discount function runner
#[derive(Debug, Parser)]
#[command(name = "gwp-function", about = "Free gift with purchase discount function", long_about = None)]
pub(crate) struct CliConfig {
    /// Function input document (JSON); reads stdin when omitted
    #[arg(short, long, env = "GWP_INPUT")]
    pub input: Option<PathBuf>,

    /// Output format (json, report)
    #[arg(short, long, env = "GWP_FORMAT", value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Read the input document, evaluate it and write the output.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or parsed, or the output cannot be written.
    #[instrument(skip_all, fields(format = ?self.format))]
    pub fn execute(&self, out: impl Write) -> Result<(), CliError> {
        let input = self.read_input()?;

        match self.format {
            OutputFormat::Json => write_result(&input, out),
            OutputFormat::Report => write_report(&input, out),
        }
    }

    fn read_input(&self) -> Result<FunctionInput, CliError> {
        let contents = match &self.input {
            Some(path) => {
                debug!(path = %path.display(), "reading function input");

                fs::read_to_string(path)?
            }
            None => {
                let mut contents = String::new();

                io::stdin().lock().read_to_string(&mut contents)?;

                contents
            }
        };

        Ok(serde_json::from_str(&contents)?)
    }
}

fn write_result(input: &FunctionInput, mut out: impl Write) -> Result<(), CliError> {
    let result = run(input);

    serde_json::to_writer(&mut out, &result)?;
    writeln!(out)?;

    Ok(())
}

fn write_report(input: &FunctionInput, out: impl Write) -> Result<(), CliError> {
    let config = resolve(&input.discount_node.to_raw());
    let cart = CartSnapshot::try_from(&input.cart)?;

    Report::new(&cart, &config).write_to(out)?;

    Ok(())
}
