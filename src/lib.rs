//! nativescan - Native library and component inventory for Android packages
//!
//! This library lists the native (`.so`) libraries an APK or split-APK bundle
//! ships, per architecture, alongside the components declared by the main
//! manifest.
//!
//! # Architecture
//!
//! The scan pipeline consists of:
//! 1. **Discovery** - Resolve inputs into one archive or a bundle of splits
//! 2. **Filtering** - Keep `lib/<arch>/<name>.so` entries
//! 3. **Aggregation** - Deduplicate libraries by file name within an archive
//! 4. **Merging** - Fold every archive of a bundle into one inventory
//! 5. **Assembly** - Attach the main manifest's components and freeze the result
//! 6. **Reporting** - Summaries and terminal/JSON output

pub mod archive;
pub mod config;
pub mod discovery;
pub mod manifest;
pub mod report;
pub mod scan;

pub use archive::{ArchiveEntry, ArchiveError, EntrySource, MemoryArchive, ZipBytesSource, ZipFileSource};
pub use config::Config;
pub use discovery::{ScanTarget, TargetResolver};
pub use manifest::{ManifestComponents, ManifestReader};
pub use report::{ReportFormat, Reporter};
pub use scan::{summarize, BundleMember, BundleScan, LibraryRecord, ScanError, ScanResult, Scanner, SkippedArchive, Stats};
