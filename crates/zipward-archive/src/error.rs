use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("failed to create staging directory for '{scope}': {source}")]
    Staging { scope: String, source: io::Error },

    #[error("failed to open archive '{path}': {source}")]
    OpenArchive { path: PathBuf, source: io::Error },

    #[error("entry path contains null byte")]
    InvalidPath,

    #[error("archive is corrupted: {0}")]
    Corrupted(#[source] zip::result::ZipError),

    #[error("duplicate archive entry '{name}'")]
    DuplicateEntry { name: String },

    #[error("failed to read entry '{name}' from archive: {source}")]
    EntryRead { name: String, source: io::Error },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("source path does not exist: {path}")]
    SourceMissing { path: PathBuf },

    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("filesystem operation failed: {source}")]
    Fs { source: zipward_fs::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<zipward_fs::Error> for Error {
    fn from(e: zipward_fs::Error) -> Self {
        Self::Fs { source: e }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
