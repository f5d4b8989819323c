use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use nativescan::config::Config;
use nativescan::discovery::{ScanTarget, TargetResolver};
use nativescan::manifest::ManifestComponents;
use nativescan::report::{ReportFormat, Reporter};
use nativescan::scan::{ArchiveInventory, ScanObserver, ScanResult, Scanner, TracingObserver};

/// nativescan - Inventory native libraries and components in Android packages
#[derive(Parser, Debug)]
#[command(name = "nativescan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// APK files, a split-APK container (.xapk/.apks/.apkm) or a directory of splits
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Decoded AndroidManifest.xml (or components JSON) of the main archive
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source id of the main archive, overriding configured patterns
    #[arg(long, value_name = "ID")]
    main: Option<String>,

    /// Show every location of each library
    #[arg(long)]
    locations: bool,

    /// Group components by package
    #[arg(long)]
    group: bool,

    /// Scan bundle members one at a time
    #[arg(long)]
    sequential: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

/// Ticks a progress bar as bundle members finish, on top of the usual logging
struct ProgressObserver {
    bar: ProgressBar,
    inner: TracingObserver,
}

impl ScanObserver for ProgressObserver {
    fn archive_started(&self, source_id: &str, is_main: bool) {
        self.bar.set_message(source_id.to_string());
        self.inner.archive_started(source_id, is_main);
    }

    fn archive_scanned(&self, source_id: &str, inventory: &ArchiveInventory) {
        self.inner.archive_scanned(source_id, inventory);
        self.bar.inc(1);
    }

    fn archive_skipped(&self, source_id: &str, reason: &str) {
        self.inner.archive_skipped(source_id, reason);
        self.bar.inc(1);
    }

    fn scan_finished(&self, result: &ScanResult) {
        self.bar.finish_and_clear();
        self.inner.scan_finished(result);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("nativescan v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    run_scan(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&config_dir(&cli.inputs))?
    };

    // Override with CLI arguments
    if cli.locations {
        config.report.show_locations = true;
    }
    if cli.group {
        config.report.group_components = true;
    }
    if cli.sequential {
        config.scan.parallel = false;
    }

    Ok(config)
}

/// Directory searched for a default config file: the first input, or its parent
fn config_dir(inputs: &[PathBuf]) -> PathBuf {
    match inputs.first() {
        Some(input) if input.is_dir() => input.clone(),
        Some(input) => input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        None => PathBuf::from("."),
    }
}

fn run_scan(config: &Config, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Resolve inputs
    let target = TargetResolver::new(config)
        .with_main(cli.main.clone())
        .resolve(&cli.inputs)
        .into_diagnostic()?;

    info!("Resolved {} archive(s)", target.archive_count());

    // Step 2: Load components of the main archive
    let manifest = match &cli.manifest {
        Some(path) => ManifestComponents::from_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to load manifest: {}", path.display()))?,
        None => {
            info!("No manifest given, component lists will be empty");
            ManifestComponents::new()
        }
    };

    // Step 3: Scan
    let mut scanner = Scanner::new().with_parallel(config.scan.parallel);
    if !config.scan.parallel && !cli.quiet {
        let bar = ProgressBar::new(target.archive_count() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .into_diagnostic()?
                .progress_chars("#>-"),
        );
        scanner = scanner.with_observer(Arc::new(ProgressObserver {
            bar,
            inner: TracingObserver,
        }));
    }

    let (result, skipped) = match &target {
        ScanTarget::Single(source) => (scanner.scan_single(source, &manifest).into_diagnostic()?, Vec::new()),
        ScanTarget::Bundle(members) => {
            let scan = scanner.scan_bundle(members, &manifest).into_diagnostic()?;
            (scan.result, scan.skipped)
        }
    };

    // Step 4: Report
    let format = cli
        .format
        .clone()
        .map(ReportFormat::from)
        .unwrap_or_else(|| ReportFormat::from_name(&config.report.format));
    let reporter = Reporter::new(format, cli.output.clone())
        .with_locations(config.report.show_locations)
        .with_grouped_components(config.report.group_components);
    reporter.report(&result, &skipped)?;

    let elapsed = start_time.elapsed();
    if !cli.quiet {
        eprintln!(
            "{}",
            format!(
                "⏱  Scanned {} archive(s) in {:.2}s",
                target.archive_count(),
                elapsed.as_secs_f64()
            )
            .dimmed()
        );
    }

    if config.scan.fail_on_skipped && !skipped.is_empty() {
        return Err(miette::miette!(
            "{} archive(s) could not be read: {}",
            skipped.len(),
            skipped
                .iter()
                .map(|s| s.source_id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    Ok(())
}
