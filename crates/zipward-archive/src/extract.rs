//! Staged zip extraction.
//!
//! Every entry is unpacked into a private staging directory first. Only when
//! the whole archive staged cleanly is the tree copied into the destination,
//! so a bad entry never leaves partial output behind.

use std::collections::HashSet;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use zipward_fs::FileSystem;

use crate::entry::{EntryKind, StagedEntry, UnzipReport};
use crate::error::{Error, Result};
use crate::options::{DuplicatePolicy, UnzipOptions};
use crate::sanitize::sanitize_entry_path;
use crate::workspace::StagingDir;

/// Extract `archive` into `destination` with default options.
///
/// `scope_name` only labels the staging directory and log lines.
pub fn unzip<F: FileSystem + ?Sized>(
    fs: &F,
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    scope_name: &str,
) -> Result<UnzipReport> {
    unzip_with_options(fs, archive, destination, scope_name, &UnzipOptions::default())
}

pub fn unzip_with_options<F: FileSystem + ?Sized>(
    fs: &F,
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    scope_name: &str,
    options: &UnzipOptions,
) -> Result<UnzipReport> {
    let archive_path = archive.as_ref();
    let destination = destination.as_ref();

    let staging = StagingDir::create(fs, scope_name)?;

    let report = {
        let reader = fs.open(archive_path).map_err(|e| Error::OpenArchive {
            path: archive_path.to_path_buf(),
            source: e,
        })?;
        let mut zip = zip::ZipArchive::new(reader).map_err(Error::Corrupted)?;
        stage_entries(fs, &mut zip, staging.path(), scope_name, options)?
    };

    let copied = staging.commit(destination)?;
    tracing::info!(
        scope = scope_name,
        destination = %destination.display(),
        entries = report.entry_count(),
        files = copied.files_copied,
        "extracted archive"
    );
    Ok(report)
}

fn stage_entries<F, R>(
    fs: &F,
    zip: &mut zip::ZipArchive<R>,
    staging: &Path,
    scope_name: &str,
    options: &UnzipOptions,
) -> Result<UnzipReport>
where
    F: FileSystem + ?Sized,
    R: Read + Seek,
{
    let mut report = UnzipReport::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for index in 0..zip.len() {
        let mut file = zip.by_index(index).map_err(Error::Corrupted)?;
        let name = file.name().to_string();

        if options.is_skipped(&name) {
            tracing::debug!(scope = scope_name, entry = %name, "skipping entry");
            report.skipped += 1;
            continue;
        }

        let target = sanitize_entry_path(&name, staging)?;
        if !seen.insert(target.clone()) && options.duplicates == DuplicatePolicy::Reject {
            return Err(Error::DuplicateEntry { name });
        }

        tracing::trace!(scope = scope_name, entry = %name, target = %target.display(), "staging entry");
        let entry = if file.is_dir() {
            create_dir(fs, &target)?;
            StagedEntry::new(name, EntryKind::Directory, 0)
        } else {
            let size = write_file(fs, &mut file, &name, &target)?;
            StagedEntry::new(name, EntryKind::File, size)
        };
        report.record(entry);
    }

    Ok(report)
}

fn create_dir<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<()> {
    fs.create_dir_all(path)
        .map_err(|e| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

fn write_file<F: FileSystem + ?Sized>(
    fs: &F,
    entry: &mut impl Read,
    name: &str,
    target: &Path,
) -> Result<u64> {
    if let Some(parent) = target.parent() {
        create_dir(fs, parent)?;
    }

    let extraction_failed = |e: std::io::Error| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    };
    let mut out = fs.create(target).map_err(extraction_failed)?;

    let mut buffer = [0u8; 8192];
    let mut written = 0u64;
    loop {
        let n = entry.read(&mut buffer).map_err(|e| Error::EntryRead {
            name: name.to_string(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        out.write_all(&buffer[..n]).map_err(extraction_failed)?;
        written += n as u64;
    }
    out.flush().map_err(extraction_failed)?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use zipward_fs::MemFs;

    use super::*;

    /// Write a zip with the given (name, content) entries; names ending in `/` become directories.
    fn write_archive(fs: &MemFs, path: &str, entries: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
        }
        let bytes = writer.finish().unwrap().into_inner();
        fs.write(Path::new(path), &bytes).unwrap();
    }

    fn leftover_staging(fs: &MemFs) -> Vec<PathBuf> {
        fs.paths()
            .into_iter()
            .filter(|p| p.starts_with(fs.temp_root()) && p != fs.temp_root())
            .collect()
    }

    #[test]
    fn extracts_files_and_directories() {
        let fs = MemFs::new();
        write_archive(
            &fs,
            "/a.zip",
            &[("app/", b""), ("app/bin/tool", b"#!/bin/sh"), ("readme.txt", b"hi")],
        );

        let report = unzip(&fs, "/a.zip", "/out", "test").unwrap();

        assert_eq!(fs.read(Path::new("/out/app/bin/tool")).unwrap(), b"#!/bin/sh");
        assert_eq!(fs.read(Path::new("/out/readme.txt")).unwrap(), b"hi");
        assert_eq!(report.entry_count(), 3);
        assert_eq!(report.total_bytes, 11);
        assert!(leftover_staging(&fs).is_empty());
    }

    #[test]
    fn macosx_entries_are_dropped() {
        let fs = MemFs::new();
        write_archive(
            &fs,
            "/a.zip",
            &[
                ("__MACOSX/", b""),
                ("__MACOSX/._doc.txt", b"junk"),
                ("doc.txt", b"doc"),
            ],
        );

        let report = unzip(&fs, "/a.zip", "/out", "test").unwrap();

        assert_eq!(report.skipped, 2);
        assert!(fs.metadata(Path::new("/out/__MACOSX")).is_err());
        assert_eq!(fs.read(Path::new("/out/doc.txt")).unwrap(), b"doc");
    }

    #[test]
    fn traversal_entry_aborts_before_destination() {
        let fs = MemFs::new();
        write_archive(
            &fs,
            "/a.zip",
            &[("good.txt", b"good"), ("../../etc/password", b"evil")],
        );

        let err = unzip(&fs, "/a.zip", "/out", "test").unwrap_err();

        assert!(matches!(err, Error::ZipSlip { .. }));
        assert!(fs.metadata(Path::new("/out")).is_err());
        assert!(fs.metadata(Path::new("/etc/password")).is_err());
        assert!(leftover_staging(&fs).is_empty());
    }

    #[test]
    fn failed_entry_leaves_destination_untouched() {
        let fs = MemFs::new();
        fs.create_dir_all(Path::new("/out")).unwrap();
        write_archive(
            &fs,
            "/a.zip",
            &[
                ("first.txt", b"first"),
                ("blocker", b"file"),
                ("blocker/inner.txt", b"cannot nest under a file"),
            ],
        );

        let err = unzip(&fs, "/a.zip", "/out", "test").unwrap_err();

        assert!(matches!(err, Error::DirectoryCreationFailed { .. }));
        assert_eq!(fs.walk(Path::new("/out")).unwrap().len(), 1);
        assert!(leftover_staging(&fs).is_empty());
    }

    #[test]
    fn duplicates_overwrite_by_default() {
        let fs = MemFs::new();
        write_archive(&fs, "/a.zip", &[("x.txt", b"first"), ("./x.txt", b"second")]);

        unzip(&fs, "/a.zip", "/out", "test").unwrap();

        assert_eq!(fs.read(Path::new("/out/x.txt")).unwrap(), b"second");
    }

    #[test]
    fn duplicates_can_be_rejected() {
        let fs = MemFs::new();
        write_archive(&fs, "/a.zip", &[("x.txt", b"first"), ("./x.txt", b"second")]);
        let options = UnzipOptions::new().duplicates(DuplicatePolicy::Reject);

        let err = unzip_with_options(&fs, "/a.zip", "/out", "test", &options).unwrap_err();

        assert!(matches!(err, Error::DuplicateEntry { ref name } if name == "./x.txt"));
        assert!(fs.metadata(Path::new("/out")).is_err());
    }

    #[test]
    fn empty_archive_creates_destination() {
        let fs = MemFs::new();
        write_archive(&fs, "/empty.zip", &[]);

        let report = unzip(&fs, "/empty.zip", "/out/nested", "test").unwrap();

        assert_eq!(report.entry_count(), 0);
        assert!(fs.metadata(Path::new("/out/nested")).unwrap().is_dir());
    }

    #[test]
    fn not_a_zip_is_corrupted() {
        let fs = MemFs::new();
        fs.write(Path::new("/junk.zip"), &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

        let err = unzip(&fs, "/junk.zip", "/out", "test").unwrap_err();

        assert!(matches!(err, Error::Corrupted(_)));
        assert!(leftover_staging(&fs).is_empty());
    }

    #[test]
    fn missing_archive_fails_to_open() {
        let fs = MemFs::new();
        let err = unzip(&fs, "/missing.zip", "/out", "test").unwrap_err();
        assert!(matches!(err, Error::OpenArchive { .. }));
        assert!(leftover_staging(&fs).is_empty());
    }

    #[test]
    fn cleanup_failure_does_not_mask_success() {
        let fs = MemFs::new();
        write_archive(&fs, "/a.zip", &[("x.txt", b"x")]);
        fs.fail_removal_of("/tmp/test-00000001");

        unzip(&fs, "/a.zip", "/out", "test").unwrap();

        assert_eq!(fs.read(Path::new("/out/x.txt")).unwrap(), b"x");
        assert!(leftover_staging(&fs).contains(&PathBuf::from("/tmp/test-00000001")));
    }

    #[test]
    fn relative_temp_root_above_cwd_still_commits() {
        let fs = MemFs::with_temp_root("../scratch");
        write_archive(&fs, "/a.zip", &[("dir/x.txt", b"x"), ("y.txt", b"y")]);

        let report = unzip(&fs, "/a.zip", "/out", "test").unwrap();

        assert_eq!(report.entry_count(), 2);
        assert_eq!(fs.read(Path::new("/out/dir/x.txt")).unwrap(), b"x");
        assert_eq!(fs.read(Path::new("/out/y.txt")).unwrap(), b"y");
        assert!(fs.metadata(Path::new("scratch")).is_err());
        assert!(leftover_staging(&fs).is_empty());
    }

    #[test]
    fn archive_without_directory_entries() {
        let fs = MemFs::new();
        write_archive(&fs, "/a.zip", &[("deep/nested/file.txt", b"data")]);

        unzip(&fs, "/a.zip", "/out", "test").unwrap();

        assert_eq!(fs.read(Path::new("/out/deep/nested/file.txt")).unwrap(), b"data");
    }
}
