//! Scan instrumentation
//!
//! The engine reports progress through a [`ScanObserver`] instead of logging
//! directly, so callers can attach progress bars or silence it in tests.

use super::aggregate::ArchiveInventory;
use super::assemble::ScanResult;
use super::stats::summarize;
use tracing::{debug, info, warn};

pub trait ScanObserver: Send + Sync {
    fn archive_started(&self, _source_id: &str, _is_main: bool) {}

    fn archive_scanned(&self, _source_id: &str, _inventory: &ArchiveInventory) {}

    fn archive_skipped(&self, _source_id: &str, _reason: &str) {}

    fn scan_finished(&self, _result: &ScanResult) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn archive_started(&self, source_id: &str, is_main: bool) {
        let role = if is_main { "main" } else { "split" };
        info!("Scanning {} archive: {}", role, source_id);
    }

    fn archive_scanned(&self, source_id: &str, inventory: &ArchiveInventory) {
        let counts = inventory.architecture_counts();
        info!(
            "{}: {} native libraries ({} entries) across {} architectures",
            source_id,
            inventory.len(),
            inventory.total_occurrences(),
            counts.len()
        );
        for (arch, count) in counts {
            debug!("  {} - {}: {} libraries", source_id, arch, count);
        }
    }

    fn archive_skipped(&self, source_id: &str, reason: &str) {
        warn!("Skipping {}: {}", source_id, reason);
    }

    fn scan_finished(&self, result: &ScanResult) {
        let stats = summarize(result);
        info!("Scan complete: {}", stats);
        debug!(
            "Components: {} activities, {} services, {} providers, {} receivers",
            result.activities().len(),
            result.services().len(),
            result.providers().len(),
            result.receivers().len()
        );
        for (arch, count) in &stats.by_architecture {
            debug!("  {}: {} libraries", arch, count);
        }
    }
}
