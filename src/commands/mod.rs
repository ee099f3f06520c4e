//! Command dispatch and handlers.

pub mod init;
pub mod run;

use std::env;

use crate::cli::Command;

/// Dispatch a parsed command to its handler, using the working directory as
/// the starting point.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let cwd = env::current_dir().map_err(|e| format!("Cannot read working directory: {e}"))?;
    match command {
        Command::Run(args) => run::run(&cwd, args),
        Command::Init { file, lang } => init::run(&cwd, file.as_deref(), lang.as_deref()),
    }
}
