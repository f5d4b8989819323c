mod terminal;
mod json;

pub use terminal::TerminalReporter;
pub use json::JsonReporter;

use crate::scan::{ScanResult, SkippedArchive};
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

impl ReportFormat {
    /// Parse a config value; unknown names fall back to the terminal report
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => ReportFormat::Json,
            _ => ReportFormat::Terminal,
        }
    }
}

/// Reporter for outputting scan results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_locations: bool,
    group_components: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_locations: false,
            group_components: false,
        }
    }

    pub fn with_locations(mut self, show: bool) -> Self {
        self.show_locations = show;
        self
    }

    pub fn with_grouped_components(mut self, group: bool) -> Self {
        self.group_components = group;
        self
    }

    /// Report a scan result and any archives that were skipped
    pub fn report(&self, result: &ScanResult, skipped: &[SkippedArchive]) -> Result<()> {
        match &self.format {
            ReportFormat::Terminal => {
                let reporter = TerminalReporter::new()
                    .with_locations(self.show_locations)
                    .with_grouped_components(self.group_components);
                reporter.report(result, skipped)
            }
            ReportFormat::Json => {
                let reporter = JsonReporter::new(self.output_path.clone());
                reporter.report(result, skipped)
            }
        }
    }
}
