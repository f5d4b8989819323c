// Single-archive native library aggregation

use super::filter::classify;
use crate::archive::ArchiveEntry;
use std::collections::{BTreeMap, BTreeSet};

/// One library file name as seen inside a single archive.
///
/// Locations are bare entry paths. The only way to turn these into report
/// records is [`super::merge::merge`] (qualified) or a single-archive
/// [`super::merge::LibraryMap`], so an already-qualified map can never be
/// merged a second time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLibrary {
    pub(crate) name: String,
    pub(crate) occurrence_count: usize,
    pub(crate) paths: Vec<String>,
    pub(crate) architectures: BTreeSet<String>,
}

impl ArchiveLibrary {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            occurrence_count: 0,
            paths: Vec::new(),
            architectures: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn occurrence_count(&self) -> usize {
        self.occurrence_count
    }

    /// Entry paths, sorted
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn architectures(&self) -> &BTreeSet<String> {
        &self.architectures
    }
}

/// Native library inventory of one archive, keyed by file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveInventory {
    pub(crate) libraries: BTreeMap<String, ArchiveLibrary>,
}

impl ArchiveInventory {
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ArchiveLibrary> {
        self.libraries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchiveLibrary> {
        self.libraries.values()
    }

    /// Number of entries across all libraries
    pub fn total_occurrences(&self) -> usize {
        self.libraries.values().map(|lib| lib.occurrence_count).sum()
    }

    /// Distinct libraries per architecture
    pub fn architecture_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for lib in self.libraries.values() {
            for arch in &lib.architectures {
                *counts.entry(arch.as_str()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Accumulates native library entries from one archive
#[derive(Debug, Default)]
pub struct LibraryAggregator {
    libraries: BTreeMap<String, ArchiveLibrary>,
}

impl LibraryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry; entries that are not native libraries are ignored
    pub fn add(&mut self, entry: &ArchiveEntry) {
        let Some(native) = classify(entry) else {
            return;
        };

        let library = self
            .libraries
            .entry(native.file_name.to_string())
            .or_insert_with(|| ArchiveLibrary::new(native.file_name));

        library.occurrence_count += 1;
        library.paths.push(native.path.to_string());
        library.architectures.insert(native.architecture.to_string());
    }

    pub fn finish(mut self) -> ArchiveInventory {
        for library in self.libraries.values_mut() {
            library.paths.sort();
        }

        ArchiveInventory {
            libraries: self.libraries,
        }
    }
}

/// Aggregate an already-enumerated entry list
pub fn aggregate<'a, I>(entries: I) -> ArchiveInventory
where
    I: IntoIterator<Item = &'a ArchiveEntry>,
{
    let mut aggregator = LibraryAggregator::new();
    for entry in entries {
        aggregator.add(entry);
    }
    aggregator.finish()
}
