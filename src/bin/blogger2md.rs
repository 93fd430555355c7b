//! blogger2md - Convert a Blogger Atom export to Markdown posts
//!
//! Usage:
//!   blogger2md                          # reads out.xml, writes posts/
//!   blogger2md -f blog.xml -o content/posts --mode lossy
//!   blogger2md --dry-run --report report.txt --report-format text

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};

use blogger2md::config::{load_config, resolve, Overrides};
use blogger2md::export::{ConversionReport, ExportOptions, Exporter, ImportMode};

#[derive(ValueEnum, Clone, Debug)]
enum ModeArg {
    /// Stop at the first entry with an unreadable timestamp
    Strict,
    /// Skip entries with unreadable timestamps
    Lossy,
}

#[derive(ValueEnum, Clone, Debug)]
enum ReportFormat {
    /// JSON format
    Json,
    /// Human-readable text
    Text,
}

#[derive(ClapParser)]
#[command(
    version,
    about = "Convert a Blogger Atom export to Markdown posts",
    long_about = "Writes one Markdown file with front matter per post found in a Blogger \
                  export. Comments, settings and other entries are skipped.\n\n\
                  Values from blogger2md.toml (or --config) are used where no flag is given."
)]
struct Cli {
    /// Blogger export file [default: out.xml]
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output directory for the posts [default: posts]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Import mode [default: strict]
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Write `draft: true` for every post
    #[arg(long)]
    force_draft: bool,

    /// Configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Generate conversion report
    #[arg(long, value_name = "REPORT_FILE")]
    report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    report_format: ReportFormat,

    /// Dry run (show what would be converted without writing)
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let options = build_options(&args)?;
    log::debug!("Export options: {:?}", options);

    let exporter = Exporter::new(options);
    let report = exporter
        .run()
        .with_context(|| format!("Failed to export {}", exporter.options().input.display()))?;

    if args.dry_run {
        eprintln!("\n{}", report.to_text());
    }

    if let Some(report_path) = &args.report {
        write_report(&report, report_path, &args.report_format)?;
        log::info!("Report written to {}", report_path.display());
    }

    if report.has_failures() {
        log::error!("{} post(s) could not be written", report.statistics.failed);
        std::process::exit(report.exit_code());
    }

    Ok(())
}

fn build_options(args: &Cli) -> Result<ExportOptions> {
    let loaded = load_config(args.config.as_deref())?;
    if let Some(loaded) = &loaded {
        log::debug!("Using config {}", loaded.path.display());
    }

    let overrides = Overrides {
        input: args.file.clone(),
        output_dir: args.output.clone(),
        mode: args.mode.as_ref().map(|mode| match mode {
            ModeArg::Strict => ImportMode::Strict,
            ModeArg::Lossy => ImportMode::Lossy,
        }),
        force_draft: args.force_draft,
        dry_run: args.dry_run,
    };
    Ok(resolve(loaded.as_ref().map(|l| &l.config), &overrides))
}

fn write_report(report: &ConversionReport, path: &Path, format: &ReportFormat) -> Result<()> {
    let content = match format {
        ReportFormat::Json => report.to_json()?,
        ReportFormat::Text => report.to_text(),
    };
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
