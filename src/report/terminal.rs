use crate::scan::{group_components_by_package, summarize, LibraryRecord, ScanResult, SkippedArchive};
use colored::Colorize;
use miette::Result;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// List every location under each library
    show_locations: bool,

    /// Group component lists by package
    group_components: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
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

    pub fn report(&self, result: &ScanResult, skipped: &[SkippedArchive]) -> Result<()> {
        if !skipped.is_empty() {
            self.print_skipped(skipped);
        }

        println!();
        if result.libraries().is_empty() {
            println!("{}", "No native libraries found.".green().bold());
        } else {
            println!(
                "{}",
                format!("Found {} native libraries:", result.library_names().len())
                    .yellow()
                    .bold()
            );
            for record in result.libraries().values() {
                self.print_library(record);
            }
        }

        println!();
        self.print_components("Activities", result.activities());
        self.print_components("Services", result.services());
        self.print_components("Providers", result.providers());
        self.print_components("Receivers", result.receivers());

        self.print_summary(result);

        Ok(())
    }

    fn print_skipped(&self, skipped: &[SkippedArchive]) {
        println!();
        println!(
            "{}",
            format!("⚠ {} archives skipped (partial report):", skipped.len()).yellow().bold()
        );
        for archive in skipped {
            println!("  {} {}", archive.source_id.cyan(), archive.reason.dimmed());
        }
    }

    fn print_library(&self, record: &LibraryRecord) {
        let architectures: Vec<&str> = record.architectures().iter().map(String::as_str).collect();

        println!(
            "  {} {} {}",
            record.name().white().bold(),
            format!("x{}", record.occurrence_count()).dimmed(),
            format!("[{}]", architectures.join(", ")).cyan()
        );

        if self.show_locations {
            for location in record.locations() {
                println!("    {} {}", "→".dimmed(), location.dimmed());
            }
        }
    }

    fn print_components(&self, title: &str, components: &[String]) {
        println!("{}", format!("{} ({})", title, components.len()).cyan().bold());

        if components.is_empty() {
            println!("  {}", "none".dimmed());
        } else if self.group_components {
            for (package, members) in group_components_by_package(components) {
                println!("  {} {}", package.white(), format!("({})", members.len()).dimmed());
                for component in members {
                    println!("    • {}", component);
                }
            }
        } else {
            for component in components {
                println!("  • {}", component);
            }
        }

        println!();
    }

    fn print_summary(&self, result: &ScanResult) {
        let stats = summarize(result);

        println!("{}", "─".repeat(60).dimmed());
        println!(
            "Summary: {} libraries, {} components",
            stats.total_libraries.to_string().yellow(),
            stats.total_components.to_string().yellow()
        );

        if !stats.by_architecture.is_empty() {
            println!();
            println!("{}", "By Architecture:".dimmed());
            for (arch, count) in &stats.by_architecture {
                println!("  {} {}", format!("{:<14}", arch).cyan(), format!("{} libraries", count));
            }
        }

        println!();
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
