//! Native library and component scanning
//!
//! The pipeline, leaves first:
//! 1. **Filter** - pick `lib/<arch>/<name>.so` entries out of an archive
//! 2. **Aggregate** - fold one archive's entries into an [`ArchiveInventory`]
//! 3. **Merge** - fold several inventories into one [`LibraryMap`], qualifying
//!    every location with its archive's source id
//! 4. **Components** - take the main manifest's component lists as-is
//! 5. **Assemble** - sort and freeze everything into a [`ScanResult`]
//! 6. **Stats** - derive display counts from a result
//!
//! [`Scanner`] drives the pipeline for a single archive or a bundle.

pub mod aggregate;
pub mod assemble;
pub mod components;
pub mod engine;
pub mod error;
pub mod filter;
pub mod merge;
pub mod observer;
pub mod stats;

pub use aggregate::{aggregate, ArchiveInventory, ArchiveLibrary, LibraryAggregator};
pub use assemble::{assemble, ScanResult};
pub use components::{deduplicate_components, group_components_by_package, select_components};
pub use engine::{BundleMember, BundleScan, Scanner};
pub use error::{ScanError, SkippedArchive};
pub use filter::{classify, is_native_library, NativeEntry};
pub use merge::{merge, LibraryMap, LibraryRecord};
pub use observer::{NoopObserver, ScanObserver, TracingObserver};
pub use stats::{summarize, Stats};
