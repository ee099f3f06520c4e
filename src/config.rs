//! Project configuration (`svi.json`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SviError;
use crate::ports::filesystem::FileSystem;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "svi.json";

/// Settings for one run, read from `svi.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Language used for tasks that do not set `ProgrammingLanguage`.
    #[serde(default, alias = "ProgrammingLanguage")]
    pub programming_language: String,
    /// Directories (or task files) to scan, relative to the project root.
    #[serde(default, alias = "SearchPaths")]
    pub search_paths: Vec<String>,
    /// Directories to prune while scanning.
    #[serde(default, alias = "IgnorePaths")]
    pub ignore_paths: Vec<String>,
}

impl RunConfig {
    /// Parses configuration JSON; `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`SviError::Config`] when the JSON is invalid.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, SviError> {
        serde_json::from_str(json)
            .map_err(|e| SviError::Config { path: path.to_path_buf(), message: e.to_string() })
    }

    /// Loads `svi.json` from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SviError::NotFound`] if the file is missing, [`SviError::Io`]
    /// if it cannot be read and [`SviError::Config`] if it is not valid JSON.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, SviError> {
        if !fs.is_file(path) {
            return Err(SviError::NotFound(path.to_path_buf()));
        }
        let raw = fs.read_to_string(path).map_err(|e| SviError::io(path, e))?;
        Self::from_json(&raw, path)
    }

    /// Pretty JSON for writing a fresh `svi.json`.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))
    }
}

/// Walks up from `start` to the first directory containing `svi.json`.
#[must_use]
pub fn find_project_root(fs: &dyn FileSystem, start: &Path) -> Option<PathBuf> {
    start.ancestors().find(|dir| fs.is_file(&dir.join(CONFIG_FILE_NAME))).map(Path::to_path_buf)
}
