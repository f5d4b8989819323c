use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for nativescan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scan behaviour
    pub scan: ScanConfig,

    /// Bundle discovery
    pub bundle: BundleConfig,

    /// Report configuration
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Aggregate bundle members in parallel
    pub parallel: bool,

    /// Exit with an error when any bundle member had to be skipped
    pub fail_on_skipped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Patterns matching the main archive's source id, e.g. "base.apk" or "*base.apk".
    /// Consulted when neither `--main` nor an XAPK `manifest.json` names the base split.
    pub main_patterns: Vec<String>,

    /// Extensions of containers that hold split APKs
    pub archive_extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json
    pub format: String,

    /// List every location under each library
    pub show_locations: bool,

    /// Group components by package
    pub group_components: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            fail_on_skipped: false,
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            main_patterns: vec!["base.apk".to_string(), "base-master.apk".to_string()],
            archive_extensions: vec!["xapk".to_string(), "apks".to_string(), "apkm".to_string()],
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            show_locations: false,
            group_components: false,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(dir: &Path) -> Result<Self> {
        let default_names = [
            ".nativescan.yml",
            ".nativescan.yaml",
            ".nativescan.toml",
            "nativescan.yml",
            "nativescan.yaml",
            "nativescan.toml",
        ];

        for name in &default_names {
            let path = dir.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Check whether a source id names the main archive of a bundle
    pub fn is_main_archive(&self, source_id: &str) -> bool {
        self.bundle
            .main_patterns
            .iter()
            .any(|pattern| glob_match(pattern, source_id))
    }

    /// Check whether a path is a split-APK container
    pub fn is_bundle_container(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.bundle
                    .archive_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Simple glob matching for names like "*base.apk", "base*" or "*base*"
fn glob_match(pattern: &str, text: &str) -> bool {
    match (pattern.strip_prefix('*'), pattern.strip_suffix('*')) {
        (Some(_), Some(_)) if pattern.len() >= 2 => text.contains(&pattern[1..pattern.len() - 1]),
        (Some(suffix), _) => text.ends_with(suffix),
        (None, Some(prefix)) => text.starts_with(prefix),
        (None, None) => text == pattern,
    }
}
