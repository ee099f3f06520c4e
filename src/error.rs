//! Error taxonomy for the generation pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while loading configuration or processing task files.
#[derive(Debug, Error)]
pub enum SviError {
    /// A task file, configuration file or env file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A file could not be interpreted.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The task file has no `# Prompt` body.
    #[error("task file has no prompt")]
    MissingPrompt,

    /// The task file has no `# Destination File` entry.
    #[error("task file has no destination file")]
    MissingDestination,

    /// No usable backend could be constructed (model, credentials).
    #[error("backend configuration error: {0}")]
    BackendConfig(String),

    /// The backend call itself failed.
    #[error("backend call failed: {0}")]
    BackendCall(#[source] PortError),

    /// The backend answered with nothing usable.
    #[error("backend returned an empty result")]
    EmptyGenerationResult,

    /// The project configuration is invalid.
    #[error("invalid configuration {}: {message}", path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// Underlying port error.
        #[source]
        source: PortError,
    },
}

impl SviError {
    /// Wraps a port error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: PortError) -> Self {
        Self::Io { path: path.into(), source }
    }
}
