//! Filesystem plumbing behind a swappable provider.
//!
//! - `provider.rs` - the [`FileSystem`] trait and its value types
//! - `os.rs` - real disk
//! - `mem.rs` - in-memory tree with fault injection
//! - `exists.rs` - existence checks
//! - `copy_dir.rs` - recursive directory copy

pub use copy_dir::{CopyReport, copy_directory_contents};
pub use error::{Error, Result};
pub use exists::{exists_and_is_file, file_exists};
pub use mem::MemFs;
pub use os::OsFs;
pub use provider::{FileKind, FileSystem, Metadata, ReadSeek, WalkEntry, WriteSeek};

mod copy_dir;
mod error;
mod exists;
mod mem;
mod os;
mod provider;
