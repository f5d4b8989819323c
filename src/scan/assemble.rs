// Final scan result

use super::merge::{LibraryMap, LibraryRecord};
use crate::manifest::ManifestComponents;
use serde::Serialize;
use std::collections::BTreeMap;

/// Inventory of one scan: native libraries plus manifest components.
///
/// Built once by [`assemble`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    library_names: Vec<String>,
    libraries: BTreeMap<String, LibraryRecord>,
    #[serde(flatten)]
    components: ManifestComponents,
}

impl ScanResult {
    /// Sorted, distinct library file names
    pub fn library_names(&self) -> &[String] {
        &self.library_names
    }

    pub fn libraries(&self) -> &BTreeMap<String, LibraryRecord> {
        &self.libraries
    }

    pub fn library(&self, name: &str) -> Option<&LibraryRecord> {
        self.libraries.get(name)
    }

    pub fn components(&self) -> &ManifestComponents {
        &self.components
    }

    pub fn activities(&self) -> &[String] {
        &self.components.activities
    }

    pub fn services(&self) -> &[String] {
        &self.components.services
    }

    pub fn providers(&self) -> &[String] {
        &self.components.providers
    }

    pub fn receivers(&self) -> &[String] {
        &self.components.receivers
    }
}

/// Sort every record and freeze the result
pub fn assemble(libraries: LibraryMap, components: ManifestComponents) -> ScanResult {
    let mut records = libraries.records;
    for record in records.values_mut() {
        record.sort_locations();
    }

    ScanResult {
        library_names: records.keys().cloned().collect(),
        libraries: records,
        components,
    }
}
