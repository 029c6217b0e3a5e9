use std::path::{Path, PathBuf};

use zipward_fs::{CopyReport, FileSystem, copy_directory_contents};

use crate::error::{Error, Result};

/// A scratch directory owned by one extraction.
///
/// The directory is removed when the guard drops, whether or not it was
/// committed. Removal failures are logged and otherwise ignored.
pub struct StagingDir<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    path: PathBuf,
}

impl<'a, F: FileSystem + ?Sized> StagingDir<'a, F> {
    /// Create a fresh directory named after `scope_name`.
    pub fn create(fs: &'a F, scope_name: &str) -> Result<Self> {
        let path = fs
            .temp_dir(&format!("{scope_name}-"))
            .map_err(|e| Error::Staging {
                scope: scope_name.to_string(),
                source: e,
            })?;
        tracing::info!(scope = scope_name, path = %path.display(), "created staging directory");
        Ok(Self { fs, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy the staged tree into `destination`, creating it if needed.
    pub fn commit(self, destination: &Path) -> Result<CopyReport> {
        self.fs
            .create_dir_all(destination)
            .map_err(|e| Error::DirectoryCreationFailed {
                path: destination.to_path_buf(),
                source: e,
            })?;
        let report = copy_directory_contents(self.fs, &self.path, destination)?;
        Ok(report)
    }
}

impl<F: FileSystem + ?Sized> Drop for StagingDir<'_, F> {
    fn drop(&mut self) {
        if let Err(e) = self.fs.remove_dir_all(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove staging directory");
        }
    }
}
