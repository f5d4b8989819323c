// Single-archive and bundle scans

use super::aggregate::{ArchiveInventory, LibraryAggregator};
use super::assemble::{assemble, ScanResult};
use super::components::select_components;
use super::error::{ScanError, SkippedArchive};
use super::merge::{merge, LibraryMap};
use super::observer::{ScanObserver, TracingObserver};
use crate::archive::{ArchiveError, EntrySource};
use crate::manifest::ManifestComponents;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// One archive of a multi-archive bundle
pub struct BundleMember {
    /// Prefix used to qualify this archive's locations
    pub source_id: String,

    /// Whether this archive's manifest is authoritative
    pub is_main: bool,

    pub source: Box<dyn EntrySource>,
}

impl BundleMember {
    pub fn new(source_id: impl Into<String>, source: impl EntrySource + 'static, is_main: bool) -> Self {
        Self {
            source_id: source_id.into(),
            is_main,
            source: Box::new(source),
        }
    }
}

impl std::fmt::Debug for BundleMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleMember")
            .field("source_id", &self.source_id)
            .field("is_main", &self.is_main)
            .field("source", &self.source.name())
            .finish()
    }
}

/// Outcome of a bundle scan: the merged result plus any archives left out
#[derive(Debug, Clone)]
pub struct BundleScan {
    pub result: ScanResult,
    pub skipped: Vec<SkippedArchive>,
}

impl BundleScan {
    /// True when at least one member could not be read
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Native library and component scanner
pub struct Scanner {
    parallel: bool,
    observer: Arc<dyn ScanObserver>,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            parallel: true,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Aggregate bundle members on the rayon pool (default) or one by one
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Scan one archive. Locations are left unqualified.
    pub fn scan_single(
        &self,
        source: &dyn EntrySource,
        manifest: &ManifestComponents,
    ) -> Result<ScanResult, ScanError> {
        self.observer.archive_started(source.name(), true);

        let inventory = aggregate_source(source).map_err(|reason| ScanError::ArchiveUnreadable {
            source_id: source.name().to_string(),
            reason,
        })?;
        self.observer.archive_scanned(source.name(), &inventory);

        let result = assemble(LibraryMap::from(inventory), select_components(manifest));
        self.observer.scan_finished(&result);

        Ok(result)
    }

    /// Scan every member of a bundle and merge their libraries.
    ///
    /// The bundle must have exactly one main member and unique source ids;
    /// both are checked before any archive is opened. A member that cannot be
    /// read is reported in [`BundleScan::skipped`] and the rest still merge.
    /// Components always come from `main_manifest`.
    pub fn scan_bundle(
        &self,
        members: &[BundleMember],
        main_manifest: &ManifestComponents,
    ) -> Result<BundleScan, ScanError> {
        validate_bundle(members)?;

        debug!("Scanning bundle of {} archives (parallel: {})", members.len(), self.parallel);

        let outcomes: Vec<Result<ArchiveInventory, ArchiveError>> = if self.parallel {
            members
                .par_iter()
                .map(|member| self.scan_member(member))
                .collect()
        } else {
            members.iter().map(|member| self.scan_member(member)).collect()
        };

        let mut scanned = Vec::with_capacity(members.len());
        let mut skipped = Vec::new();

        for (member, outcome) in members.iter().zip(outcomes) {
            match outcome {
                Ok(inventory) => scanned.push((member.source_id.as_str(), inventory)),
                Err(e) => {
                    let reason = e.to_string();
                    self.observer.archive_skipped(&member.source_id, &reason);
                    skipped.push(SkippedArchive {
                        source_id: member.source_id.clone(),
                        reason,
                    });
                }
            }
        }

        let result = assemble(merge(scanned), select_components(main_manifest));
        self.observer.scan_finished(&result);

        Ok(BundleScan { result, skipped })
    }

    fn scan_member(&self, member: &BundleMember) -> Result<ArchiveInventory, ArchiveError> {
        self.observer.archive_started(&member.source_id, member.is_main);
        let inventory = aggregate_source(&*member.source)?;
        self.observer.archive_scanned(&member.source_id, &inventory);
        Ok(inventory)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Enumerate a source straight into an aggregator; a failure mid-way discards
/// whatever was collected
fn aggregate_source(source: &dyn EntrySource) -> Result<ArchiveInventory, ArchiveError> {
    let mut aggregator = LibraryAggregator::new();
    source.visit_entries(&mut |entry| aggregator.add(&entry))?;
    Ok(aggregator.finish())
}

fn validate_bundle(members: &[BundleMember]) -> Result<(), ScanError> {
    let mut seen = HashSet::new();
    for member in members {
        if !seen.insert(member.source_id.as_str()) {
            return Err(ScanError::DuplicateSourceId(member.source_id.clone()));
        }
    }

    let mains: Vec<String> = members
        .iter()
        .filter(|m| m.is_main)
        .map(|m| m.source_id.clone())
        .collect();

    match mains.len() {
        0 => Err(ScanError::MissingMainArchive),
        1 => Ok(()),
        _ => Err(ScanError::MultipleMainArchives(mains)),
    }
}
