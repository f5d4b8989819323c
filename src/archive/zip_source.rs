use super::{ArchiveEntry, ArchiveError, EntrySource};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;
use zip::ZipArchive;

/// A zip-format package on disk (`.apk`)
#[derive(Debug, Clone)]
pub struct ZipFileSource {
    path: PathBuf,
    name: String,
}

impl ZipFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntrySource for ZipFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn visit_entries(&self, visit: &mut dyn FnMut(ArchiveEntry)) -> Result<(), ArchiveError> {
        let file = File::open(&self.path)?;
        let archive = ZipArchive::new(BufReader::new(file))?;
        visit_zip(archive, visit)
    }
}

/// A zip-format package held in memory, e.g. a split APK pulled out of an XAPK
#[derive(Debug, Clone)]
pub struct ZipBytesSource {
    name: String,
    bytes: Arc<[u8]>,
}

impl ZipBytesSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl EntrySource for ZipBytesSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn visit_entries(&self, visit: &mut dyn FnMut(ArchiveEntry)) -> Result<(), ArchiveError> {
        let archive = ZipArchive::new(Cursor::new(&self.bytes[..]))?;
        visit_zip(archive, visit)
    }
}

/// Walk the central directory without decompressing entry data
fn visit_zip<R: Read + Seek>(
    mut archive: ZipArchive<R>,
    visit: &mut dyn FnMut(ArchiveEntry),
) -> Result<(), ArchiveError> {
    trace!("Enumerating {} zip entries", archive.len());

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        visit(ArchiveEntry {
            path: entry.name().to_string(),
            is_dir: entry.is_dir(),
        });
    }

    Ok(())
}
