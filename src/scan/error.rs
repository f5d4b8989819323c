use crate::archive::ArchiveError;
use serde::Serialize;
use thiserror::Error;

/// Scan errors
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Archive '{source_id}' could not be read: {reason}")]
    ArchiveUnreadable {
        source_id: String,
        #[source]
        reason: ArchiveError,
    },
    #[error("Bundle has no main archive")]
    MissingMainArchive,
    #[error("Bundle has more than one main archive: {}", .0.join(", "))]
    MultipleMainArchives(Vec<String>),
    #[error("Duplicate source id in bundle: {0}")]
    DuplicateSourceId(String),
}

/// A bundle member left out of the merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedArchive {
    pub source_id: String,
    pub reason: String,
}
