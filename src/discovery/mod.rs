//! Scan target discovery
//!
//! Turns command line inputs into either a single archive or a bundle
//! descriptor:
//! - one `.apk` file is scanned on its own
//! - a split-APK container (`.xapk`, `.apks`, `.apkm`) contributes every inner `*.apk`
//! - a directory contributes every `*.apk` directly inside it
//! - several `.apk` files form a bundle
//!
//! The main member is, in order: the `--main` override, the split an XAPK
//! `manifest.json` lists with id `base`, the first match of
//! `bundle.main_patterns`, or the only member.

use crate::archive::{ArchiveError, EntrySource, ZipBytesSource, ZipFileSource};
use crate::config::Config;
use crate::scan::BundleMember;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

const APK_EXTENSION: &str = "apk";
const CONTAINER_MANIFEST: &str = "manifest.json";
const BASE_SPLIT_ID: &str = "base";

/// Upper bound on the buffer reserved up front for one inner APK; the declared
/// size comes from the container and is not trusted
const MAX_PREALLOCATION: u64 = 64 << 20;

/// Discovery errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Input not found: {0}")]
    NotFound(PathBuf),
    #[error("Unsupported input (expected .apk, a split-APK container or a directory): {0}")]
    Unsupported(PathBuf),
    #[error("No APK files found in {0}")]
    Empty(PathBuf),
    #[error("No inputs given")]
    NoInputs,
    #[error("Failed to read bundle container {path}: {source}")]
    Container {
        path: PathBuf,
        source: ArchiveError,
    },
    #[error("Container {container} holds two splits named {name}: {first} and {second}")]
    DuplicateSplit {
        container: PathBuf,
        name: String,
        first: String,
        second: String,
    },
    #[error("Failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What a scan run operates on
#[derive(Debug)]
pub enum ScanTarget {
    Single(ZipFileSource),
    Bundle(Vec<BundleMember>),
}

impl ScanTarget {
    pub fn archive_count(&self) -> usize {
        match self {
            ScanTarget::Single(_) => 1,
            ScanTarget::Bundle(members) => members.len(),
        }
    }
}

/// Splits pulled out of a container
#[derive(Debug)]
pub struct ContainerSplits {
    /// One source per inner `*.apk`, named by its file name
    pub splits: Vec<ZipBytesSource>,

    /// Source id of the split the container's `manifest.json` declares as base
    pub base: Option<String>,
}

/// The part of an XAPK `manifest.json` that describes splits
#[derive(Debug, Default, Deserialize)]
struct ContainerManifest {
    #[serde(default)]
    split_apks: Vec<SplitDescriptor>,
}

#[derive(Debug, Deserialize)]
struct SplitDescriptor {
    file: String,
    id: String,
}

/// Resolves inputs into a [`ScanTarget`]
pub struct TargetResolver<'a> {
    config: &'a Config,
    main_override: Option<String>,
}

impl<'a> TargetResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            main_override: None,
        }
    }

    /// Mark the member with this source id as main, ignoring configured patterns
    pub fn with_main(mut self, source_id: Option<String>) -> Self {
        self.main_override = source_id;
        self
    }

    pub fn resolve(&self, inputs: &[PathBuf]) -> Result<ScanTarget, DiscoveryError> {
        for input in inputs {
            if !input.exists() {
                return Err(DiscoveryError::NotFound(input.clone()));
            }
        }

        match inputs {
            [] => Err(DiscoveryError::NoInputs),
            [input] if input.is_dir() => self.resolve_directory(input),
            [input] if self.config.is_bundle_container(input) => self.resolve_container(input),
            [input] if is_apk(input) && self.main_override.is_none() => {
                Ok(ScanTarget::Single(ZipFileSource::new(input.clone())))
            }
            _ => self.resolve_files(inputs),
        }
    }

    fn resolve_files(&self, inputs: &[PathBuf]) -> Result<ScanTarget, DiscoveryError> {
        let mut sources = Vec::with_capacity(inputs.len());
        for input in inputs {
            if !input.is_file() || !is_apk(input) {
                return Err(DiscoveryError::Unsupported(input.clone()));
            }
            sources.push(ZipFileSource::new(input.clone()));
        }

        Ok(ScanTarget::Bundle(self.build_members(sources, None)))
    }

    fn resolve_directory(&self, dir: &Path) -> Result<ScanTarget, DiscoveryError> {
        let mut sources = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_apk(entry.path()) {
                trace!("Found split {}", entry.path().display());
                sources.push(ZipFileSource::new(entry.into_path()));
            }
        }

        if sources.is_empty() {
            return Err(DiscoveryError::Empty(dir.to_path_buf()));
        }

        Ok(ScanTarget::Bundle(self.build_members(sources, None)))
    }

    fn resolve_container(&self, path: &Path) -> Result<ScanTarget, DiscoveryError> {
        let ContainerSplits { splits, base } = read_container(path)?;

        if splits.is_empty() {
            return Err(DiscoveryError::Empty(path.to_path_buf()));
        }

        Ok(ScanTarget::Bundle(self.build_members(splits, base.as_deref())))
    }

    fn build_members<S>(&self, sources: Vec<S>, declared_main: Option<&str>) -> Vec<BundleMember>
    where
        S: EntrySource + 'static,
    {
        let ids: Vec<String> = sources.iter().map(|s| s.name().to_string()).collect();
        let mains: Vec<bool> = match self.main_override.as_deref().or(declared_main) {
            Some(main) => ids.iter().map(|id| id == main).collect(),
            None => {
                let matched: Vec<bool> = ids.iter().map(|id| self.config.is_main_archive(id)).collect();
                if !matched.contains(&true) && ids.len() == 1 {
                    vec![true]
                } else {
                    matched
                }
            }
        };

        debug!(
            "Bundle members: {}",
            ids.iter()
                .zip(&mains)
                .map(|(id, main)| if *main { format!("{} (main)", id) } else { id.clone() })
                .collect::<Vec<_>>()
                .join(", ")
        );

        sources
            .into_iter()
            .zip(ids)
            .zip(mains)
            .map(|((source, id), is_main)| BundleMember::new(id, source, is_main))
            .collect()
    }
}

fn is_apk(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(APK_EXTENSION))
        .unwrap_or(false)
}

fn file_name(inner_path: &str) -> &str {
    inner_path.rsplit('/').next().unwrap_or(inner_path)
}

/// Pull every `*.apk` out of a split-APK container into memory.
///
/// The source id of each split is its file name inside the container; two
/// splits with the same file name in different folders are rejected. The base
/// split declared by an XAPK `manifest.json` is reported when it is present.
pub fn read_container(path: &Path) -> Result<ContainerSplits, DiscoveryError> {
    let (inner, manifest) = read_inner_apks(path).map_err(|source| DiscoveryError::Container {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(inner.len());
    for (inner_path, _) in &inner {
        if let Some(first) = seen.insert(file_name(inner_path), inner_path) {
            return Err(DiscoveryError::DuplicateSplit {
                container: path.to_path_buf(),
                name: file_name(inner_path).to_string(),
                first: first.to_string(),
                second: inner_path.clone(),
            });
        }
    }

    let base = manifest.and_then(|manifest| declared_base(&manifest, &seen, path));
    let splits = inner.into_iter().map(|(_, source)| source).collect();

    Ok(ContainerSplits { splits, base })
}

/// Map the manifest's base split onto a source id, if that split exists
fn declared_base(
    manifest: &ContainerManifest,
    splits: &HashMap<&str, &str>,
    container: &Path,
) -> Option<String> {
    let descriptor = manifest.split_apks.iter().find(|s| s.id == BASE_SPLIT_ID)?;
    let declared = descriptor.file.trim_start_matches("./");
    let name = file_name(declared);

    match splits.get(name) {
        Some(inner_path) if *inner_path == declared => {
            debug!("{} declares {} as base split", container.display(), name);
            Some(name.to_string())
        }
        _ => {
            warn!(
                "{} declares base split {} but the container does not hold it",
                container.display(),
                descriptor.file
            );
            None
        }
    }
}

/// Read inner APKs (with their full inner paths) and the container manifest
fn read_inner_apks(
    path: &Path,
) -> Result<(Vec<(String, ZipBytesSource)>, Option<ContainerManifest>), ArchiveError> {
    let file = File::open(path)?;
    let mut container = ZipArchive::new(BufReader::new(file))?;
    let mut splits = Vec::new();
    let mut manifest = None;

    for index in 0..container.len() {
        let mut entry = container.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        if entry.name() == CONTAINER_MANIFEST {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            match serde_json::from_slice::<ContainerManifest>(&bytes) {
                Ok(parsed) => manifest = Some(parsed),
                Err(e) => warn!("Ignoring unreadable {} in {}: {}", CONTAINER_MANIFEST, path.display(), e),
            }
            continue;
        }

        if !is_apk(Path::new(entry.name())) {
            continue;
        }

        let inner_path = entry.name().to_string();
        let mut bytes = Vec::with_capacity(entry.size().min(MAX_PREALLOCATION) as usize);
        entry.read_to_end(&mut bytes)?;
        debug!("Extracted {} ({} bytes) from {}", inner_path, bytes.len(), path.display());

        let source = ZipBytesSource::new(file_name(&inner_path), bytes);
        splits.push((inner_path, source));
    }

    Ok((splits, manifest))
}
