//! PDF Normalize CLI tool
//!
//! A command-line tool for normalizing PDF page sizes.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::process;

use pdf_normalize::pdf::{NormalizeOptions, PageSizeNormalizer};
use pdf_normalize::report::render_text;
use pdf_normalize::size::DEFAULT_TOLERANCE;
use pdf_normalize::ScaleMode;

/// PDF Normalize - Give every page of a PDF the same size
#[derive(Parser)]
#[command(name = "pdf-normalize")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Normalize page sizes, writing report.txt and report.json
    pdf-normalize scan.pdf scan-normalized.pdf

    # Insert a blank page so it becomes page 3 of the output
    pdf-normalize scan.pdf out.pdf --insert_blank 3

    # Keep proportions of resized pages and choose report locations
    pdf-normalize scan.pdf out.pdf --keep-proportion --report_txt changes.txt --report_json changes.json

    # Show the target size and planned changes without writing anything
    pdf-normalize scan.pdf out.pdf --dry-run")]
struct Cli {
    /// Source PDF file
    input: PathBuf,

    /// Output PDF file path
    output: PathBuf,

    /// Page number (starting from 1) at which to insert a blank page; 0 disables
    #[arg(long = "insert_blank", visible_alias = "insert-blank", value_name = "PAGE")]
    insert_blank: Option<usize>,

    /// Path to the text report file
    #[arg(long = "report_txt", visible_alias = "report-txt", default_value = "report.txt")]
    report_txt: PathBuf,

    /// Path to the JSON report file
    #[arg(long = "report_json", visible_alias = "report-json", default_value = "report.json")]
    report_json: PathBuf,

    /// Largest size difference, in points, still treated as the same size
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Scale resized pages uniformly and centre them instead of stretching
    #[arg(long)]
    keep_proportion: bool,

    /// Print the planned changes without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Open the output file after creation
    #[arg(long)]
    open: bool,

    /// Log progress details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose { LevelFilter::Info } else { LevelFilter::Warn })
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.input.exists() {
        bail!("Input file not found: {}", cli.input.display());
    }
    if cli.tolerance.is_nan() || cli.tolerance < 0.0 {
        bail!("Tolerance must be a non-negative number, got {}", cli.tolerance);
    }

    let options = NormalizeOptions {
        input_path: cli.input.clone(),
        output_path: cli.output.clone(),
        report_txt: cli.report_txt,
        report_json: cli.report_json,
        // Page numbers are 1-based; 0 means no blank page
        insert_blank_at: cli.insert_blank.filter(|&page| page > 0).map(|page| page - 1),
        tolerance: cli.tolerance,
        scale_mode: if cli.keep_proportion { ScaleMode::Fit } else { ScaleMode::Stretch },
    };
    let normalizer = PageSizeNormalizer::new(options);

    if cli.dry_run {
        let plan = normalizer
            .analyze()
            .with_context(|| format!("Failed to analyze {}", cli.input.display()))?;
        println!("Target size: {} x {}", plan.target.width, plan.target.height);
        print!("{}", render_text(&plan.entries));
        return Ok(());
    }

    eprintln!("Normalizing {}...", cli.input.display());

    let summary = normalizer
        .normalize()
        .with_context(|| format!("Failed to normalize {}", cli.input.display()))?;

    eprintln!(
        "Target size: {} x {} ({} pages in, {} pages out)",
        summary.target.width,
        summary.target.height,
        summary.source_page_count,
        summary.output_page_count()
    );
    eprintln!("Output: {}", summary.output_path.display());
    eprintln!(
        "Reports: {}, {}",
        summary.report_txt.display(),
        summary.report_json.display()
    );

    if cli.open {
        open_file(&summary.output_path)?;
    }

    Ok(())
}

/// Open a file with the system default application
fn open_file(path: &PathBuf) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .context("Failed to launch viewer")?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .context("Failed to launch viewer")?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()
            .context("Failed to launch viewer")?;
    }
    Ok(())
}
