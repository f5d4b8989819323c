// Native library entry classification

use crate::archive::ArchiveEntry;

/// Directory holding native libraries inside an APK
pub const LIB_ROOT: &str = "lib/";

/// Shared object suffix
pub const NATIVE_SUFFIX: &str = ".so";

/// A native library entry split into its path segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeEntry<'a> {
    /// Full entry path, e.g. `lib/arm64-v8a/libfoo.so`
    pub path: &'a str,

    /// ABI directory, e.g. `arm64-v8a`
    pub architecture: &'a str,

    /// File name, e.g. `libfoo.so`
    pub file_name: &'a str,
}

/// Classify an entry as a native library.
///
/// Only `lib/<architecture>/<file>.so` qualifies. Deeper or shallower paths are
/// not libraries and are skipped without error. Matching is exact-string.
pub fn classify(entry: &ArchiveEntry) -> Option<NativeEntry<'_>> {
    if entry.is_dir || !entry.path.starts_with(LIB_ROOT) || !entry.path.ends_with(NATIVE_SUFFIX) {
        return None;
    }

    let mut segments = entry.path.split('/');
    match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(architecture), Some(file_name), None) => Some(NativeEntry {
            path: &entry.path,
            architecture,
            file_name,
        }),
        _ => None,
    }
}

pub fn is_native_library(entry: &ArchiveEntry) -> bool {
    classify(entry).is_some()
}
