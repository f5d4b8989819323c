//! Manifest-declared components
//!
//! The scanner takes the four component lists of the main archive's manifest as
//! given. Decoding binary AXML is left to other tools; this module only reads
//! already-decoded text manifests and a plain JSON form of the lists.

mod xml;

pub use xml::ManifestReader;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Manifest loading errors
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse manifest JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to parse manifest XML: {0}")]
    XmlError(#[from] quick_xml::Error),
}

/// Component class names declared by one manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestComponents {
    pub activities: Vec<String>,
    pub services: Vec<String>,
    pub providers: Vec<String>,
    pub receivers: Vec<String>,
}

impl ManifestComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of declared components across all four lists
    pub fn total(&self) -> usize {
        self.activities.len() + self.services.len() + self.providers.len() + self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Load components from a decoded `AndroidManifest.xml` or a `.json` file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let components = match extension {
            "json" => serde_json::from_str(&contents)?,
            _ => ManifestReader::new().read(&contents)?,
        };

        debug!(
            "Loaded manifest {}: {} components",
            path.display(),
            components.total()
        );

        Ok(components)
    }
}
