//! Page size normalization of a whole PDF file

use std::fs;
use std::path::{Path, PathBuf};
use lopdf::Document;
use crate::error::{Error, Result};
use crate::plan::{plan_pages, RenderPlan, ScaleMode};
use crate::report::{write_json_report, write_text_report, ReportEntry};
use crate::size::{compute_target_size, PageSize, DEFAULT_TOLERANCE};
use super::pages::{open_document, page_geometries, PageGeometry};
use super::render::render_plan;

/// Options for normalizing a PDF
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Source PDF file path
    pub input_path: PathBuf,
    /// Normalized PDF file path
    pub output_path: PathBuf,
    /// Human-readable report path
    pub report_txt: PathBuf,
    /// JSON report path
    pub report_json: PathBuf,
    /// 0-based output position of an extra blank page
    pub insert_blank_at: Option<usize>,
    /// Allowed difference, in points, between matching page sizes
    pub tolerance: f64,
    /// How resized pages are fitted onto the target size
    pub scale_mode: ScaleMode,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_path: PathBuf::new(),
            report_txt: PathBuf::from("report.txt"),
            report_json: PathBuf::from("report.json"),
            insert_blank_at: None,
            tolerance: DEFAULT_TOLERANCE,
            scale_mode: ScaleMode::Stretch,
        }
    }
}

/// Outcome of a finished normalization
#[derive(Debug, Clone)]
pub struct NormalizeSummary {
    pub target: PageSize,
    pub source_page_count: usize,
    pub entries: Vec<ReportEntry>,
    pub output_path: PathBuf,
    pub report_txt: PathBuf,
    pub report_json: PathBuf,
}

impl NormalizeSummary {
    pub fn output_page_count(&self) -> usize {
        self.entries.len()
    }
}

/// Source document and its output plan for one call to `normalize`
struct NormalizationRun {
    source: Document,
    geometries: Vec<PageGeometry>,
    plan: RenderPlan,
}

/// Normalizes every page of a PDF to one representative size
///
/// # Example
///
/// ```no_run
/// use pdf_normalize::pdf::{NormalizeOptions, PageSizeNormalizer};
/// use std::path::PathBuf;
///
/// let options = NormalizeOptions {
///     input_path: PathBuf::from("scanned.pdf"),
///     output_path: PathBuf::from("normalized.pdf"),
///     insert_blank_at: Some(2),
///     ..Default::default()
/// };
///
/// let summary = PageSizeNormalizer::new(options).normalize().expect("Failed to normalize");
/// println!("{} x {}", summary.target.width, summary.target.height);
/// ```
#[derive(Debug, Clone)]
pub struct PageSizeNormalizer {
    options: NormalizeOptions,
}

impl PageSizeNormalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Compute the target size and page plan without writing anything
    pub fn analyze(&self) -> Result<RenderPlan> {
        Ok(self.start_run()?.plan)
    }

    /// Write the normalized PDF followed by the text and JSON reports
    pub fn normalize(&self) -> Result<NormalizeSummary> {
        let run = self.start_run()?;
        let options = &self.options;

        let mut output = render_plan(&run.source, &run.geometries, &run.plan)?;
        save_document(&mut output, &options.output_path)?;
        log::info!(
            "wrote {} pages to {}",
            run.plan.page_count(),
            options.output_path.display()
        );

        let entries = run.plan.entries;
        write_text_report(&options.report_txt, &entries)
            .map_err(|source| partial_output(options, &options.report_txt, source))?;
        write_json_report(&options.report_json, &entries)
            .map_err(|source| partial_output(options, &options.report_json, source))?;

        Ok(NormalizeSummary {
            target: run.plan.target,
            source_page_count: run.geometries.len(),
            entries,
            output_path: options.output_path.clone(),
            report_txt: options.report_txt.clone(),
            report_json: options.report_json.clone(),
        })
    }

    fn start_run(&self) -> Result<NormalizationRun> {
        let options = &self.options;
        let source = open_document(&options.input_path)?;
        let geometries = page_geometries(&source)?;
        let sizes: Vec<PageSize> = geometries.iter().map(PageGeometry::size).collect();

        if sizes.is_empty() {
            return Err(Error::EmptyDocument(options.input_path.clone()));
        }

        let target = compute_target_size(&sizes, options.tolerance)?;
        log::info!(
            "{}: {} pages, target size {} x {}",
            options.input_path.display(),
            sizes.len(),
            target.width,
            target.height
        );

        let plan = plan_pages(
            &sizes,
            target,
            options.insert_blank_at,
            options.tolerance,
            options.scale_mode,
        );

        Ok(NormalizationRun { source, geometries, plan })
    }
}

/// Serialize in memory first so a bad destination is reported as a write error
fn save_document(doc: &mut Document, path: &Path) -> Result<()> {
    doc.compress();
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;

    fs::write(path, buffer).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn partial_output(options: &NormalizeOptions, report: &Path, source: std::io::Error) -> Error {
    Error::PartialOutput {
        output: options.output_path.clone(),
        report: report.to_path_buf(),
        source,
    }
}
