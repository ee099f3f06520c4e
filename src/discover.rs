//! Discovery of task files under the configured search paths.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SviError;
use crate::paths;
use crate::ports::filesystem::FileSystem;
use crate::task::TASK_EXTENSION;

/// Finds every `.svi` file under `search_paths`, skipping anything under
/// `ignore_paths`.
///
/// Relative paths resolve against `root_dir`. A missing search path is
/// logged and skipped. Ignored directories are pruned before descending, so
/// an ignore path wins over an overlapping search path. Entries are visited
/// in sorted order; results of overlapping search paths are not deduplicated.
///
/// Ignore matching is a string prefix test on the resolved absolute path:
/// ignoring `gen` prunes `gen/`, `gen/sub/` and also `generated/`.
///
/// Symbolic links met while walking are neither descended nor collected. A
/// search path that is itself a link is followed.
///
/// # Errors
///
/// Returns [`SviError::Io`] when a directory cannot be listed.
pub fn discover(
    fs: &dyn FileSystem,
    search_paths: &[String],
    ignore_paths: &[String],
    root_dir: &Path,
) -> Result<Vec<PathBuf>, SviError> {
    let walker = Walker {
        fs,
        ignored: ignore_paths.iter().map(|p| paths::resolve(root_dir, p)).collect(),
    };

    let mut results = Vec::new();
    for search_path in search_paths {
        let path = paths::resolve(root_dir, search_path);
        if !fs.exists(&path) {
            warn!(path = %path.display(), "search path not found");
            continue;
        }
        walker.visit(&path, &mut results)?;
    }
    Ok(results)
}

struct Walker<'a> {
    fs: &'a dyn FileSystem,
    ignored: Vec<PathBuf>,
}

impl Walker<'_> {
    fn is_ignored(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.ignored.iter().any(|ignored| path.starts_with(&*ignored.to_string_lossy()))
    }

    fn visit(&self, path: &Path, results: &mut Vec<PathBuf>) -> Result<(), SviError> {
        if self.is_ignored(path) {
            debug!(path = %path.display(), "ignored");
            return Ok(());
        }

        if self.fs.is_dir(path) {
            let entries = self.fs.list_dir(path).map_err(|e| SviError::io(path, e))?;
            for name in entries {
                let entry = path.join(name);
                if self.fs.is_symlink(&entry) {
                    debug!(path = %entry.display(), "not following symlink");
                    continue;
                }
                self.visit(&entry, results)?;
            }
        } else if self.fs.is_file(path) && is_task_file(path) {
            results.push(path.to_path_buf());
        }
        Ok(())
    }
}

fn is_task_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TASK_EXTENSION))
}
