#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// An entry that made it into the staging area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedEntry {
    /// The name exactly as stored in the archive.
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
}

impl StagedEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind, size: u64) -> Self {
        Self {
            name: name.into(),
            kind,
            size,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnzipReport {
    pub entries: Vec<StagedEntry>,
    /// Entries dropped by a skip prefix.
    pub skipped: usize,
    pub total_bytes: u64,
}

impl UnzipReport {
    pub(crate) fn record(&mut self, entry: StagedEntry) {
        self.total_bytes += entry.size;
        self.entries.push(entry);
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn files(&self) -> impl Iterator<Item = &StagedEntry> {
        self.entries.iter().filter(|e| e.is_file())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}
