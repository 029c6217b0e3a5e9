/// Default entry-name prefixes dropped during extraction.
pub const MACOSX_METADATA_PREFIX: &str = "__MACOSX";

/// What to do when an archive names the same entry twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Later entries overwrite earlier ones.
    #[default]
    Overwrite,
    /// Fail the extraction before anything reaches the destination.
    Reject,
}

#[derive(Clone, Debug)]
pub struct UnzipOptions {
    pub skip_prefixes: Vec<String>,
    pub duplicates: DuplicatePolicy,
}

impl Default for UnzipOptions {
    fn default() -> Self {
        Self {
            skip_prefixes: vec![MACOSX_METADATA_PREFIX.to_string()],
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl UnzipOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also skip entries whose name starts with `prefix`.
    pub fn skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.skip_prefixes.push(prefix.into());
        self
    }

    /// Replace the whole skip list, including the default `__MACOSX` prefix.
    pub fn skip_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub(crate) fn is_skipped(&self, entry_name: &str) -> bool {
        self.skip_prefixes
            .iter()
            .any(|prefix| entry_name.starts_with(prefix.as_str()))
    }
}

/// Compression used for file entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            Self::Deflated => zip::CompressionMethod::Deflated,
            Self::Stored => zip::CompressionMethod::Stored,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ZipOptions {
    pub compression: Compression,
    pub unix_permissions: Option<u32>,
}

impl ZipOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn unix_permissions(mut self, mode: u32) -> Self {
        self.unix_permissions = Some(mode);
        self
    }

    pub(crate) fn file_options(&self) -> zip::write::SimpleFileOptions {
        let options =
            zip::write::SimpleFileOptions::default().compression_method(self.compression.method());
        match self.unix_permissions {
            Some(mode) => options.unix_permissions(mode),
            None => options,
        }
    }
}
