use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to walk '{path}': {source}")]
    Walk { path: PathBuf, source: io::Error },

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// The path the failing operation was acting on, if known.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Walk { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::CreateDir { path, .. } => Some(path),
            Self::Io(_) => None,
        }
    }

    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::Walk { source, .. }
            | Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::CreateDir { source, .. }
            | Self::Io(source) => source.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
