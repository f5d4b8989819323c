use super::{ArchiveEntry, ArchiveError, EntrySource};

/// An archive whose entry list is already known, e.g. from a listing or a test
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    name: String,
    entries: Vec<ArchiveEntry>,
}

impl MemoryArchive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Build from plain paths; a trailing `/` marks a directory entry
    pub fn from_paths(name: impl Into<String>, paths: &[&str]) -> Self {
        let entries = paths
            .iter()
            .map(|path| {
                if path.ends_with('/') {
                    ArchiveEntry::dir(*path)
                } else {
                    ArchiveEntry::file(*path)
                }
            })
            .collect();

        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn with_entry(mut self, entry: ArchiveEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntrySource for MemoryArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn visit_entries(&self, visit: &mut dyn FnMut(ArchiveEntry)) -> Result<(), ArchiveError> {
        for entry in &self.entries {
            visit(entry.clone());
        }
        Ok(())
    }
}
