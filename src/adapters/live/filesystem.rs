//! Live filesystem adapter using `std::fs`.

use std::path::Path;

use crate::error::PortError;
use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        Ok(std::fs::read(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_missing_parents_and_lists_sorted() {
        let dir = std::env::temp_dir().join("svi_live_fs_test");
        let _ = std::fs::remove_dir_all(&dir);
        let fs = LiveFileSystem;

        fs.write(&dir.join("nested/b.txt"), "b").unwrap();
        fs.write(&dir.join("nested/a.txt"), "a").unwrap();

        assert!(fs.is_dir(&dir.join("nested")));
        assert!(fs.is_file(&dir.join("nested/a.txt")));
        assert_eq!(fs.list_dir(&dir.join("nested")).unwrap(), vec!["a.txt", "b.txt"]);
        assert_eq!(fs.read(&dir.join("nested/b.txt")).unwrap(), b"b");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_detected_without_following() {
        let dir = std::env::temp_dir().join("svi_live_fs_symlink");
        let _ = std::fs::remove_dir_all(&dir);
        let fs = LiveFileSystem;
        fs.write(&dir.join("real/a.svi"), "").unwrap();
        std::os::unix::fs::symlink(dir.join("real"), dir.join("link")).unwrap();

        assert!(fs.is_symlink(&dir.join("link")));
        assert!(fs.is_dir(&dir.join("link")));
        assert!(!fs.is_symlink(&dir.join("real")));
        assert!(!fs.is_symlink(&dir.join("missing")));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
