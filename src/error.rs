//! Error types for the page size normalizer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the page size normalizer
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input exists but could not be parsed as a PDF
    #[error("Cannot open PDF {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyDocument(PathBuf),

    /// No page falls within tolerance of the mode size
    #[error("No pages within tolerance of the most common page size")]
    NoSimilarPages,

    /// Planned page refers to a source page that does not exist
    #[error("Source page {0} not found")]
    MissingPage(usize),

    /// Output PDF could not be written
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output PDF was saved but a report could not be written
    #[error("Saved {} but could not write report {}: {source}", output.display(), report.display())]
    PartialOutput {
        output: PathBuf,
        report: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
