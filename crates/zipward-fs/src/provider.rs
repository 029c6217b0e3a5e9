//! The filesystem provider seam.
//!
//! Every operation in this workspace goes through [`FileSystem`] so callers can
//! swap the real disk ([`crate::OsFs`]) for an in-memory tree ([`crate::MemFs`]).

use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};

pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

pub trait WriteSeek: Write + Seek {}

impl<T: Write + Seek + ?Sized> WriteSeek for T {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metadata {
    pub kind: FileKind,
    pub len: u64,
}

impl Metadata {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }
}

/// One node visited by [`FileSystem::walk`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub kind: FileKind,
}

impl WalkEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

pub trait FileSystem {
    /// Metadata for `path`, following symlinks. `NotFound` when absent.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate a file for writing. The parent must already exist.
    fn create(&self, path: &Path) -> io::Result<Box<dyn WriteSeek>>;

    fn open(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>>;

    /// Create a fresh, uniquely named directory whose name starts with `prefix`.
    ///
    /// The caller owns the returned directory and is responsible for removing it.
    fn temp_dir(&self, prefix: &str) -> io::Result<PathBuf>;

    /// `root` followed by all of its descendants, depth-first, with siblings
    /// ordered by file name.
    fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>>;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.open(path)?.read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let mut file = self.create(path)?;
        file.write_all(content)?;
        file.flush()
    }
}
