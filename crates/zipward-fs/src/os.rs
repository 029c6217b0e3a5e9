use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::provider::{FileKind, FileSystem, Metadata, ReadSeek, WalkEntry, WriteSeek};

/// The real filesystem.
#[derive(Clone, Debug, Default)]
pub struct OsFs {
    temp_root: Option<PathBuf>,
}

impl OsFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create temporary directories under `root` instead of the system default.
    pub fn with_temp_root(root: impl AsRef<Path>) -> Self {
        Self {
            temp_root: Some(root.as_ref().to_path_buf()),
        }
    }
}

fn kind_of(file_type: fs::FileType) -> FileKind {
    if file_type.is_dir() {
        FileKind::Directory
    } else {
        FileKind::File
    }
}

impl FileSystem for OsFs {
    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        let meta = fs::metadata(path)?;
        Ok(Metadata {
            kind: kind_of(meta.file_type()),
            len: meta.len(),
        })
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn WriteSeek>> {
        Ok(Box::new(fs::File::create(path)?))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>> {
        Ok(Box::new(fs::File::open(path)?))
    }

    fn temp_dir(&self, prefix: &str) -> io::Result<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir.keep())
    }

    fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>> {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| {
                let entry = entry.map_err(io::Error::from)?;
                Ok(WalkEntry {
                    kind: kind_of(entry.file_type()),
                    path: entry.into_path(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn walk_is_depth_first_and_sorted() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir_all(root.join("a")).unwrap();
        std::fs::write(root.join("a/x.txt"), "x").unwrap();
        std::fs::write(root.join("a.txt"), "a").unwrap();
        std::fs::write(root.join("b.txt"), "b").unwrap();

        let walked: Vec<_> = OsFs::new()
            .walk(&root)
            .unwrap()
            .into_iter()
            .map(|e| e.path.strip_prefix(&root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            walked,
            vec![
                PathBuf::new(),
                PathBuf::from("a"),
                PathBuf::from("a/x.txt"),
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
            ]
        );
    }

    #[test]
    fn walk_missing_root_fails() {
        let dir = tempdir().unwrap();
        let result = OsFs::new().walk(&dir.path().join("missing"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn temp_dir_honours_root_and_prefix() {
        let dir = tempdir().unwrap();
        let fs = OsFs::with_temp_root(dir.path());

        let first = fs.temp_dir("scope-").unwrap();
        let second = fs.temp_dir("scope-").unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with(dir.path()));
        assert!(first.is_dir());
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("scope-"));
    }

    #[test]
    fn read_and_write_round_through_the_trait() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.bin");
        let fs = OsFs::new();

        fs.write(&path, b"payload")?;
        assert_eq!(fs.read(&path)?, b"payload");
        assert_eq!(fs.metadata(&path)?.len, 7);
        assert!(fs.metadata(dir.path())?.is_dir());
        Ok(())
    }
}
