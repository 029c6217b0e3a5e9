use std::io::{self, Write};
use std::path::{Component, Path};

use zipward_fs::FileSystem;

use crate::entry::BuildReport;
use crate::error::{Error, Result};
use crate::options::ZipOptions;

/// Zip `source` into a new archive at `target` with default options.
///
/// Entry names are relative to the parent of `source`, so the archive holds a
/// top-level `source` folder. With `skip_containing_folder` and a directory
/// source, that folder is dropped and the archive holds its contents directly.
pub fn zip_source<F: FileSystem + ?Sized>(
    fs: &F,
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    skip_containing_folder: bool,
) -> Result<BuildReport> {
    zip_source_with_options(fs, source, target, skip_containing_folder, &ZipOptions::default())
}

pub fn zip_source_with_options<F: FileSystem + ?Sized>(
    fs: &F,
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    skip_containing_folder: bool,
    options: &ZipOptions,
) -> Result<BuildReport> {
    let source = source.as_ref();
    let target = target.as_ref();

    let info = match fs.metadata(source) {
        Ok(info) => info,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::SourceMissing {
                path: source.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::Io(e)),
    };
    let skip_source_dir = skip_containing_folder && info.is_dir();
    let base = if skip_source_dir {
        source
    } else {
        source.parent().unwrap_or(Path::new(""))
    };

    let entries = fs.walk(source).map_err(|e| zipward_fs::Error::Walk {
        path: source.to_path_buf(),
        source: e,
    })?;

    tracing::info!(source = %source.display(), target = %target.display(), "building archive");
    let out = fs.create(target).map_err(|e| zipward_fs::Error::Write {
        path: target.to_path_buf(),
        source: e,
    })?;
    let mut writer = zip::ZipWriter::new(out);
    let mut report = BuildReport::default();

    for entry in entries {
        let Ok(rel) = entry.path.strip_prefix(base) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let name = entry_name(rel);

        if entry.is_dir() {
            writer.add_directory(format!("{name}/"), options.file_options())?;
            report.directories += 1;
        } else {
            writer.start_file(name.as_str(), options.file_options())?;
            let mut file = fs.open(&entry.path).map_err(|e| zipward_fs::Error::Read {
                path: entry.path.clone(),
                source: e,
            })?;
            report.bytes += io::copy(&mut file, &mut writer)?;
            report.files += 1;
        }
        tracing::trace!(entry = %name, "added to archive");
    }

    let mut out = writer.finish()?;
    out.flush()?;
    Ok(report)
}

/// Forward-slash entry name for a relative path.
fn entry_name(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
