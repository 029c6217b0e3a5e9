use std::io;
use std::path::Path;

use crate::provider::FileSystem;

/// Whether `path` exists and is a regular file.
///
/// Lookup failures other than "not found" are logged and reported as `false`.
pub fn exists_and_is_file<F: FileSystem + ?Sized>(fs: &F, path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match fs.metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to stat path");
            false
        }
    }
}

/// Whether anything (file or directory) exists at `path`.
///
/// Only a definite "not found" counts as absent. Other lookup failures are
/// logged and reported as `true`.
pub fn file_exists<F: FileSystem + ?Sized>(fs: &F, path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match fs.metadata(path) {
        Ok(_) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to stat path");
            true
        }
    }
}
