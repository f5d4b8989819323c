// Aggregate counts over a scan result

use super::assemble::ScanResult;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Summary numbers for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Distinct native libraries
    pub total_libraries: usize,
    /// Components across all four lists
    pub total_components: usize,
    /// Every architecture seen
    pub architectures: BTreeSet<String>,
    /// Distinct libraries per architecture (not occurrences)
    pub by_architecture: BTreeMap<String, usize>,
}

pub fn summarize(result: &ScanResult) -> Stats {
    let mut architectures = BTreeSet::new();
    let mut by_architecture = BTreeMap::new();

    for record in result.libraries().values() {
        for arch in record.architectures() {
            architectures.insert(arch.clone());
            *by_architecture.entry(arch.clone()).or_insert(0) += 1;
        }
    }

    Stats {
        total_libraries: result.library_names().len(),
        total_components: result.components().total(),
        architectures,
        by_architecture,
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} native libraries across {} architectures, {} components",
            self.total_libraries,
            self.architectures.len(),
            self.total_components
        )
    }
}
