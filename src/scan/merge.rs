// Cross-archive merge of per-archive inventories

use super::aggregate::{ArchiveInventory, ArchiveLibrary};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A native library as reported for a whole scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryRecord {
    name: String,
    occurrence_count: usize,
    locations: Vec<String>,
    architectures: BTreeSet<String>,
}

impl LibraryRecord {
    fn from_archive(library: ArchiveLibrary, qualifier: Option<&str>) -> Self {
        let locations = match qualifier {
            Some(source_id) => library
                .paths
                .iter()
                .map(|path| qualify(source_id, path))
                .collect(),
            None => library.paths,
        };

        Self {
            name: library.name,
            occurrence_count: library.occurrence_count,
            locations,
            architectures: library.architectures,
        }
    }

    fn absorb(&mut self, other: LibraryRecord) {
        self.occurrence_count += other.occurrence_count;
        self.locations.extend(other.locations);
        self.architectures.extend(other.architectures);
    }

    pub(crate) fn sort_locations(&mut self) {
        self.locations.sort();
    }

    /// File name, the dedup key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of matching entries; always equal to `locations().len()`
    pub fn occurrence_count(&self) -> usize {
        self.occurrence_count
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn architectures(&self) -> &BTreeSet<String> {
        &self.architectures
    }
}

/// Prefix an entry path with the archive it came from
pub fn qualify(source_id: &str, path: &str) -> String {
    format!("{}:{}", source_id, path)
}

/// Library records keyed by file name, ready for assembly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryMap {
    pub(crate) records: BTreeMap<String, LibraryRecord>,
}

impl LibraryMap {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&LibraryRecord> {
        self.records.get(name)
    }

    fn insert_or_absorb(&mut self, record: LibraryRecord) {
        match self.records.get_mut(&record.name) {
            Some(existing) => existing.absorb(record),
            None => {
                self.records.insert(record.name.clone(), record);
            }
        }
    }
}

/// A single archive's inventory, locations left unqualified
impl From<ArchiveInventory> for LibraryMap {
    fn from(inventory: ArchiveInventory) -> Self {
        let records = inventory
            .libraries
            .into_iter()
            .map(|(name, library)| (name, LibraryRecord::from_archive(library, None)))
            .collect();

        Self { records }
    }
}

/// Fold per-archive inventories into one map.
///
/// Each location is prefixed with `<source_id>:`. Records sharing a file name
/// add their counts, concatenate their locations and union their
/// architectures. Locations are not re-sorted here; assembly does that.
pub fn merge<I, S>(per_archive: I) -> LibraryMap
where
    I: IntoIterator<Item = (S, ArchiveInventory)>,
    S: AsRef<str>,
{
    let mut merged = LibraryMap::default();

    for (source_id, inventory) in per_archive {
        for library in inventory.libraries.into_values() {
            merged.insert_or_absorb(LibraryRecord::from_archive(library, Some(source_id.as_ref())));
        }
    }

    merged
}
