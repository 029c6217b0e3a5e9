use std::path::Path;

use crate::provider::FileSystem;
use crate::{Error, Result};

/// Counters for a finished [`copy_directory_contents`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub dirs_created: usize,
    pub files_copied: usize,
    pub bytes_copied: u64,
}

/// Copy everything below `source` into `destination`, keeping the layout.
///
/// `destination` must already exist. Existing directories are merged into and
/// existing files are overwritten. The first failure stops the walk, so a
/// failed call may leave a partially populated destination.
pub fn copy_directory_contents<F: FileSystem + ?Sized>(
    fs: &F,
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<CopyReport> {
    let source = source.as_ref();
    let destination = destination.as_ref();
    let mut report = CopyReport::default();

    let entries = fs.walk(source).map_err(|e| Error::Walk {
        path: source.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let Ok(rel) = entry.path.strip_prefix(source) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let dest_path = destination.join(rel);

        if entry.is_dir() {
            fs.create_dir_all(&dest_path).map_err(|e| Error::CreateDir {
                path: dest_path.clone(),
                source: e,
            })?;
            report.dirs_created += 1;
        } else {
            let data = fs.read(&entry.path).map_err(|e| Error::Read {
                path: entry.path.clone(),
                source: e,
            })?;
            fs.write(&dest_path, &data).map_err(|e| Error::Write {
                path: dest_path.clone(),
                source: e,
            })?;
            report.files_copied += 1;
            report.bytes_copied += data.len() as u64;
        }
        tracing::trace!(from = %entry.path.display(), to = %dest_path.display(), "copied");
    }

    Ok(report)
}
