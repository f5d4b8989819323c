use crate::scan::{summarize, ScanResult, SkippedArchive, Stats};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, result: &ScanResult, skipped: &[SkippedArchive]) -> Result<()> {
        let json = Self::render(result, skipped)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }

    /// Render the report document without writing it anywhere
    pub fn render(result: &ScanResult, skipped: &[SkippedArchive]) -> Result<String> {
        let report = JsonReport::new(result, skipped);
        serde_json::to_string_pretty(&report).into_diagnostic()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    partial: bool,
    summary: Stats,
    libraries: Vec<JsonLibrary<'a>>,
    components: JsonComponents<'a>,
    skipped: &'a [SkippedArchive],
}

#[derive(Serialize)]
struct JsonLibrary<'a> {
    name: &'a str,
    count: usize,
    architectures: Vec<&'a str>,
    locations: &'a [String],
}

#[derive(Serialize)]
struct JsonComponents<'a> {
    activities: &'a [String],
    services: &'a [String],
    providers: &'a [String],
    receivers: &'a [String],
}

impl<'a> JsonReport<'a> {
    fn new(result: &'a ScanResult, skipped: &'a [SkippedArchive]) -> Self {
        let libraries = result
            .libraries()
            .values()
            .map(|record| JsonLibrary {
                name: record.name(),
                count: record.occurrence_count(),
                architectures: record.architectures().iter().map(String::as_str).collect(),
                locations: record.locations(),
            })
            .collect();

        Self {
            version: "1.0",
            partial: !skipped.is_empty(),
            summary: summarize(result),
            libraries,
            components: JsonComponents {
                activities: result.activities(),
                services: result.services(),
                providers: result.providers(),
                receivers: result.receivers(),
            },
            skipped,
        }
    }
}
