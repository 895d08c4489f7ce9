//! Whole-file writes via temp file + rename.

use hakoniwa_core::error::{HakoniwaError, Result};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// A handle to a file that is only ever replaced as a whole.
///
/// Provides:
/// - **Atomicity**: readers see either the old or the new content
/// - **Durability**: explicit fsync before rename
///
/// There is no locking; one writer per path is assumed.
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file's content.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The complete new content
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Content written and renamed into place
    /// - `Err`: Failed to create the directory, write, sync or rename
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(bytes)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Temp file in the same directory, so the rename never crosses devices.
    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| HakoniwaError::io(format!("Path has no file name: {:?}", self.path)))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("state.json");

        AtomicFile::new(&file_path).write(b"{}\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{}\n");
        assert!(!temp_dir.path().join("nested").join(".state.json.tmp").exists());
    }

    #[test]
    fn test_write_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("a.txt"));

        file.write(b"first").unwrap();
        file.write(b"second").unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "second");
    }
}
