//! Core library entry for the `svi` CLI.
//!
//! `svi` scans a project for `.svi` task files, regenerates the ones whose
//! content changed since the last run, and writes the generated code to each
//! task's destination file.

pub mod adapters;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod discover;
pub mod error;
pub mod logging;
pub mod output;
pub mod paths;
pub mod ports;
pub mod runner;
pub mod task;

#[cfg(test)]
mod testing;

use clap::error::ErrorKind;
use clap::Parser;

pub use error::SviError;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    match logging::init(&logging::level_for(cli.verbose, cli.quiet)) {
        Ok(()) | Err(logging::LoggerError::AlreadyInitialized) => {}
        Err(err) => return Err(err.to_string()),
    }
    commands::dispatch(&cli.command)
}
