//! cukereport CLI
//!
//! Main entry point for turning cucumber JSON result documents into an HTML
//! report directory.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use cuke_builder::{BuildPhase, BuildStatus, ReportBuilder, ReportConfig};
use tracing_subscriber::EnvFilter;

/// Exit code when the report was generated but the suite has failing steps.
const EXIT_TESTS_FAILED: u8 = 1;

/// Exit code when report generation itself failed.
const EXIT_GENERATION_FAILED: u8 = 2;

/// cukereport - cucumber JSON to HTML report generator
///
/// Parses one or more cucumber JSON result documents and renders a linked
/// set of HTML pages (feature overview, per-feature, per-tag, tag overview,
/// screenshots) into the output directory.
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)] // one field per CLI switch
#[command(name = "cuke-report")]
#[command(version, about, long_about = None)]
struct Args {
    /// Cucumber JSON result documents to include in the report
    #[arg(value_name = "DOCUMENT")]
    documents: Vec<PathBuf>,

    /// Path to configuration file (default: cukereport.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory for the generated report
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// CI build number shown on every page
    #[arg(long, value_name = "NUMBER")]
    build_number: Option<String>,

    /// CI project name shown on every page
    #[arg(long, value_name = "NAME")]
    build_project: Option<String>,

    /// Base URL path used for CI links
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Treat skipped steps as failing their feature or tag
    #[arg(long)]
    skip_failures: bool,

    /// Treat undefined steps as failing their feature or tag
    #[arg(long)]
    undefined_failures: bool,

    /// Render charts with the legacy flash chart engine
    #[arg(long, conflicts_with = "rich_charts")]
    legacy_charts: bool,

    /// Render charts with the rich stacked-column engine
    #[arg(long)]
    rich_charts: bool,

    /// Embed the artifact viewer on feature pages
    #[arg(long)]
    embed_artifacts: bool,

    /// Mark the report as hosted by a CI server
    #[arg(long)]
    ci: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_GENERATION_FAILED)
        }
    }
}

/// Loads the configuration, runs the builder and maps the outcome to an
/// exit code: 0 when the suite passed, 1 when it has failing steps, 2 when
/// the report could not be generated.
fn run(args: Args) -> anyhow::Result<ExitCode> {
    let mut config = load_config(args.config.as_deref())?;

    // Apply CLI argument overrides
    if !args.documents.is_empty() {
        config.input_documents.clone_from(&args.documents);
    }
    if let Some(ref output_dir) = args.output_dir {
        config.output_dir.clone_from(output_dir);
    }
    if let Some(ref build_number) = args.build_number {
        config.build_number.clone_from(build_number);
    }
    if let Some(ref build_project) = args.build_project {
        config.build_project.clone_from(build_project);
    }
    if let Some(ref base_url) = args.base_url {
        config.base_url.clone_from(base_url);
    }
    config.skip_failures |= args.skip_failures;
    config.undefined_failures |= args.undefined_failures;
    config.use_legacy_charts |= args.legacy_charts;
    config.use_rich_charts |= args.rich_charts;
    config.embed_artifacts |= args.embed_artifacts;
    config.from_ci |= args.ci;

    // Re-validate after overrides
    config.validate()?;

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create output directory: {e}\n\nPath: {}",
            config.output_dir.display()
        )
    })?;

    tracing::info!(
        documents = config.input_documents.len(),
        output_dir = %config.output_dir.display(),
        "Generating report"
    );

    let output_dir = config.output_dir.clone();
    let mut builder = ReportBuilder::new(config);
    let phase = builder.build();

    if phase == BuildPhase::Failed {
        eprintln!("Report generation failed, see {}", output_dir.display());
        return Ok(ExitCode::from(EXIT_GENERATION_FAILED));
    }

    println!("Report written to {}", output_dir.display());
    match builder.build_status() {
        BuildStatus::Passed => Ok(ExitCode::SUCCESS),
        BuildStatus::Failed => Ok(ExitCode::from(EXIT_TESTS_FAILED)),
    }
}

/// Loads configuration from the given path, or from `cukereport.json` in the
/// current directory when no path was given. A missing default file yields
/// the built-in defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<ReportConfig> {
    let path = path.map_or_else(|| PathBuf::from("cukereport.json"), Path::to_path_buf);
    tracing::debug!(config = %path.display(), "Loading configuration");
    Ok(ReportConfig::load_from_file(&path)?)
}
