//! In-memory filesystem.
//!
//! Paths are stored after dropping `.` components; `..` is kept verbatim, so
//! callers are expected to hand in already-resolved paths.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::provider::{FileKind, FileSystem, Metadata, ReadSeek, WalkEntry, WriteSeek};

#[derive(Clone, Debug)]
enum Node {
    Dir,
    File(Vec<u8>),
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<PathBuf, Node>,
    write_faults: BTreeSet<PathBuf>,
    removal_faults: BTreeSet<PathBuf>,
    metadata_faults: BTreeSet<PathBuf>,
    next_temp: u64,
}

impl State {
    fn is_dir(&self, path: &Path) -> bool {
        is_root(path) || matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn check_parent(&self, path: &Path) -> io::Result<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        match self.nodes.get(parent) {
            _ if is_root(parent) => Ok(()),
            Some(Node::Dir) => Ok(()),
            Some(Node::File(_)) => Err(io::Error::from(io::ErrorKind::NotADirectory)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn check_write_fault(&self, path: &Path) -> io::Result<()> {
        if self.write_faults.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected write fault at {}", path.display()),
            ));
        }
        Ok(())
    }
}

fn is_root(path: &Path) -> bool {
    path.parent().is_none() || path.as_os_str().is_empty()
}

fn key(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// A cheaply clonable in-memory filesystem; clones share the same tree.
#[derive(Clone, Debug)]
pub struct MemFs {
    state: Arc<Mutex<State>>,
    temp_root: PathBuf,
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemFs {
    /// An empty tree containing only `/tmp`, which also serves as the temp root.
    pub fn new() -> Self {
        Self::with_temp_root("/tmp")
    }

    pub fn with_temp_root(root: impl AsRef<Path>) -> Self {
        let temp_root = key(root.as_ref());
        let fs = Self {
            state: Arc::default(),
            temp_root,
        };
        {
            let mut state = fs.state();
            for ancestor in fs.temp_root.ancestors().filter(|p| !is_root(p)) {
                state.nodes.insert(ancestor.to_path_buf(), Node::Dir);
            }
        }
        fs
    }

    /// Seed a set of directories, e.g. a fake home and working directory.
    pub fn with_dirs<I, P>(self, dirs: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for dir in dirs {
            self.create_dir_all(dir.as_ref())?;
        }
        Ok(self)
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Make writes and `create_dir_all` at exactly `path` fail with `PermissionDenied`.
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        self.state().write_faults.insert(key(path.as_ref()));
    }

    /// Make `remove_dir_all` of exactly `path` fail with `PermissionDenied`.
    pub fn fail_removal_of(&self, path: impl AsRef<Path>) {
        self.state().removal_faults.insert(key(path.as_ref()));
    }

    /// Make `metadata` of exactly `path` fail with `PermissionDenied`.
    pub fn fail_metadata_of(&self, path: impl AsRef<Path>) {
        self.state().metadata_faults.insert(key(path.as_ref()));
    }

    pub fn clear_faults(&self) {
        let mut state = self.state();
        state.write_faults.clear();
        state.removal_faults.clear();
        state.metadata_faults.clear();
    }

    /// Every path currently stored, in walk order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.state().nodes.keys().cloned().collect()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileSystem for MemFs {
    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        let path = key(path);
        let state = self.state();
        if state.metadata_faults.contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected metadata fault at {}", path.display()),
            ));
        }
        if is_root(&path) {
            return Ok(Metadata {
                kind: FileKind::Directory,
                len: 0,
            });
        }
        match state.nodes.get(&path) {
            Some(Node::Dir) => Ok(Metadata {
                kind: FileKind::Directory,
                len: 0,
            }),
            Some(Node::File(data)) => Ok(Metadata {
                kind: FileKind::File,
                len: data.len() as u64,
            }),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let path = key(path);
        let mut state = self.state();
        let mut missing: Vec<PathBuf> = Vec::new();
        for ancestor in path.ancestors().filter(|p| !is_root(p)) {
            match state.nodes.get(ancestor) {
                Some(Node::Dir) => break,
                Some(Node::File(_)) => {
                    return Err(io::Error::from(io::ErrorKind::NotADirectory));
                }
                None => missing.push(ancestor.to_path_buf()),
            }
        }
        if missing.first() == Some(&path) {
            state.check_write_fault(&path)?;
        }
        for dir in missing {
            state.nodes.insert(dir, Node::Dir);
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let path = key(path);
        let mut state = self.state();
        if state.removal_faults.contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected removal fault at {}", path.display()),
            ));
        }
        match state.nodes.get(&path) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => return Err(io::Error::from(io::ErrorKind::NotADirectory)),
            None => return Err(io::Error::from(io::ErrorKind::NotFound)),
        }
        state.nodes.retain(|k, _| !k.starts_with(&path));
        Ok(())
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn WriteSeek>> {
        let path = key(path);
        let mut state = self.state();
        if state.is_dir(&path) {
            return Err(io::Error::from(io::ErrorKind::IsADirectory));
        }
        state.check_parent(&path)?;
        state.check_write_fault(&path)?;
        state.nodes.insert(path.clone(), Node::File(Vec::new()));
        Ok(Box::new(MemWriter {
            state: Arc::clone(&self.state),
            path,
            buf: Cursor::new(Vec::new()),
        }))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>> {
        let path = key(path);
        let state = self.state();
        if state.is_dir(&path) {
            return Err(io::Error::from(io::ErrorKind::IsADirectory));
        }
        match state.nodes.get(&path) {
            Some(Node::File(data)) => Ok(Box::new(Cursor::new(data.clone()))),
            _ => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn temp_dir(&self, prefix: &str) -> io::Result<PathBuf> {
        let mut state = self.state();
        if !state.is_dir(&self.temp_root) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        loop {
            state.next_temp += 1;
            let candidate = self
                .temp_root
                .join(format!("{prefix}{:08}", state.next_temp));
            if !state.nodes.contains_key(&candidate) {
                state.nodes.insert(candidate.clone(), Node::Dir);
                return Ok(candidate);
            }
        }
    }

    fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>> {
        let root = key(root);
        let state = self.state();
        let root_kind = match state.nodes.get(&root) {
            _ if is_root(&root) => FileKind::Directory,
            Some(Node::Dir) => FileKind::Directory,
            Some(Node::File(_)) => FileKind::File,
            None => return Err(io::Error::from(io::ErrorKind::NotFound)),
        };
        let mut entries = vec![WalkEntry {
            path: root.clone(),
            kind: root_kind,
        }];
        if root_kind == FileKind::Directory {
            entries.extend(
                state
                    .nodes
                    .range(root.clone()..)
                    .filter(|(path, _)| **path != root && path.starts_with(&root))
                    .map(|(path, node)| WalkEntry {
                        path: path.clone(),
                        kind: match node {
                            Node::Dir => FileKind::Directory,
                            Node::File(_) => FileKind::File,
                        },
                    }),
            );
        }
        Ok(entries)
    }
}

/// Buffers writes and publishes them on flush and on drop.
struct MemWriter {
    state: Arc<Mutex<State>>,
    path: PathBuf,
    buf: Cursor<Vec<u8>>,
}

impl MemWriter {
    fn publish(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .nodes
            .insert(self.path.clone(), Node::File(self.buf.get_ref().clone()));
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.publish();
        Ok(())
    }
}

impl Seek for MemWriter {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.buf.seek(pos)
    }
}

impl Drop for MemWriter {
    fn drop(&mut self) {
        self.publish();
    }
}
