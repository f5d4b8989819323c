//! Archive entry sources
//!
//! The scanner classifies archive entries by path alone, so a source only has to
//! enumerate `(path, is_dir)` pairs. Content bytes are never read.

mod memory;
mod zip_source;

pub use memory::MemoryArchive;
pub use zip_source::{ZipBytesSource, ZipFileSource};

use thiserror::Error;

/// Errors raised while opening or enumerating an archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to open archive: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read zip container: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// One entry of an archive's central directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveEntry {
    /// Entry path, `/`-separated
    pub path: String,

    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl ArchiveEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Something that can enumerate the entries of one archive.
///
/// Implementations acquire whatever handle they need inside
/// [`EntrySource::visit_entries`] and release it before returning, on success
/// and on failure alike. Sources are shared across the rayon pool during a
/// bundle scan, hence the `Send + Sync` bound.
pub trait EntrySource: Send + Sync {
    /// Display name used in diagnostics
    fn name(&self) -> &str;

    /// Call `visit` once per entry, in container order
    fn visit_entries(&self, visit: &mut dyn FnMut(ArchiveEntry)) -> Result<(), ArchiveError>;

    /// Collect every entry eagerly
    fn entries(&self) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        let mut entries = Vec::new();
        self.visit_entries(&mut |entry| entries.push(entry))?;
        Ok(entries)
    }
}
