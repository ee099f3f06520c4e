//! Change-detection cache for task files.
//!
//! Each directory holding task files gets a `.svicache` file with one
//! `"<file name> <sha256 hex>"` line per task. A task is up to date when the
//! fingerprint of its current bytes matches the stored one; modification
//! times play no part, so the cache survives copies and checkouts.
//!
//! File names must not contain whitespace: the format splits on the first
//! space and does not escape anything.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::SviError;
use crate::ports::filesystem::FileSystem;

/// Name of the per-directory cache file.
pub const CACHE_FILE_NAME: &str = ".svicache";

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Fingerprints of the task files in one directory.
pub struct ChangeCache<'a> {
    fs: &'a dyn FileSystem,
    dir: PathBuf,
    entries: BTreeMap<String, String>,
}

impl<'a> ChangeCache<'a> {
    /// Opens the cache for `dir`, loading `.svicache` if present.
    ///
    /// A missing, unreadable or malformed cache file yields an empty cache.
    #[must_use]
    pub fn open(fs: &'a dyn FileSystem, dir: &Path) -> Self {
        let path = dir.join(CACHE_FILE_NAME);
        let entries = if fs.is_file(&path) {
            match fs.read_to_string(&path) {
                Ok(content) => parse_entries(&content),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unreadable cache file, starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            debug!(dir = %dir.display(), "no cache file");
            BTreeMap::new()
        };
        Self { fs, dir: dir.to_path_buf(), entries }
    }

    /// The stored fingerprint for `file_name`, if any.
    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.entries.get(file_name).map(String::as_str)
    }

    /// Returns `true` only if `file_name` exists and its current fingerprint
    /// matches the stored one.
    #[must_use]
    pub fn is_valid(&self, file_name: &str) -> bool {
        let Some(stored) = self.get(file_name) else {
            return false;
        };
        let path = self.dir.join(file_name);
        if !self.fs.is_file(&path) {
            return false;
        }
        match self.fs.read(&path) {
            Ok(bytes) => fingerprint(&bytes) == stored,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot fingerprint file");
                false
            }
        }
    }

    /// Records the current fingerprint of `file_name` and writes the cache file.
    ///
    /// # Errors
    ///
    /// Returns [`SviError::NotFound`] if the file is gone and [`SviError::Io`]
    /// if it cannot be read or the cache file cannot be written.
    pub fn update(&mut self, file_name: &str) -> Result<(), SviError> {
        let path = self.dir.join(file_name);
        if !self.fs.is_file(&path) {
            return Err(SviError::NotFound(path));
        }
        let bytes = self.fs.read(&path).map_err(|e| SviError::io(&path, e))?;
        self.entries.insert(file_name.to_string(), fingerprint(&bytes));
        self.save()
    }

    fn save(&self) -> Result<(), SviError> {
        let path = self.dir.join(CACHE_FILE_NAME);
        let content: String =
            self.entries.iter().map(|(name, hash)| format!("{name} {hash}\n")).collect();
        self.fs.write(&path, &content).map_err(|e| SviError::io(&path, e))
    }
}

fn parse_entries(content: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(hash), None) => {
                entries.insert(name.to_string(), hash.to_string());
            }
            _ => debug!(line, "skipping malformed cache line"),
        }
    }
    entries
}
