//! Console logging setup for the binary.

use std::io::IsTerminal;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The filter directive could not be parsed.
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
    /// A global subscriber is already installed.
    #[error("Logger has been already initialized")]
    AlreadyInitialized,
}

/// Picks the filter directive from the CLI flags and environment.
///
/// `RUST_LOG` wins when set. Otherwise `quiet` gives `warn`, `DEBUG=true` or
/// one `-v` gives `debug`, two or more give `trace`, and the default is `info`.
#[must_use]
pub fn level_for(verbose: u8, quiet: bool) -> String {
    if let Ok(directive) = std::env::var("RUST_LOG") {
        if !directive.trim().is_empty() {
            return directive;
        }
    }
    let debug_env = std::env::var("DEBUG").is_ok_and(|v| v.eq_ignore_ascii_case("true"));
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) if debug_env => "debug",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    level.to_string()
}

/// Installs a text subscriber on stderr; colour only when stderr is a terminal.
///
/// # Errors
///
/// Returns [`LoggerError`] for an invalid directive or a second initialization.
pub fn init(level: &str) -> Result<(), LoggerError> {
    let filter =
        EnvFilter::try_new(level).map_err(|_| LoggerError::InvalidLogLevel(level.to_string()))?;
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_beats_verbose() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert_eq!(level_for(3, true), "warn");
    }

    #[test]
    fn verbosity_raises_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert_eq!(level_for(1, false), "debug");
        assert_eq!(level_for(2, false), "trace");
    }

    #[test]
    fn invalid_directive_is_rejected() {
        assert!(matches!(init("svi=loudest"), Err(LoggerError::InvalidLogLevel(_))));
    }
}
