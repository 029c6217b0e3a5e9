//! Zip creation and staged extraction with zip-slip protection.
//!
//! # Architecture
//!
//! - `create.rs` - Archive building from a file or directory tree
//! - `extract.rs` - Extraction through a staging directory
//! - `sanitize.rs` - Entry path sanitization (zip-slip prevention)
//! - `workspace.rs` - Staging directory lifetime and commit
//! - `options.rs` / `entry.rs` - Configuration and reports

pub use create::{zip_source, zip_source_with_options};
pub use entry::{BuildReport, EntryKind, StagedEntry, UnzipReport};
pub use error::{Error, Result};
pub use extract::{unzip, unzip_with_options};
pub use options::{Compression, DuplicatePolicy, MACOSX_METADATA_PREFIX, UnzipOptions, ZipOptions};
pub use sanitize::sanitize_entry_path;
pub use workspace::StagingDir;

mod create;
pub mod entry;
mod error;
mod extract;
pub mod options;
mod sanitize;
mod workspace;
