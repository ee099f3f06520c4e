//! Filesystem port for file I/O operations.

use std::path::Path;

use crate::error::PortError;

/// Provides filesystem access for reading and writing files.
///
/// Abstracting the filesystem lets the parser, cache, walker and runner be
/// exercised against an in-memory tree without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Reads the exact bytes of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read(&self, path: &Path) -> Result<Vec<u8>, PortError>;

    /// Writes the given contents to a file, creating parent directories and
    /// overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if the path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns `true` if the path is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Returns `true` if the path itself is a symbolic link, without
    /// following it.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Lists the entry names of a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError>;
}
