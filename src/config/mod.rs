mod loader;

pub use loader::{BundleConfig, Config, ReportConfig, ScanConfig};
