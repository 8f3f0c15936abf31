//! PDF Normalize Library
//!
//! A cross-platform library for giving every page of a PDF the same size.
//! This library provides functionality to:
//! - Find the representative page size of a document
//! - Rescale pages that deviate from it
//! - Insert a blank page at a chosen position
//! - Write text and JSON reports of what changed
//!
//! # Example
//!
//! ```no_run
//! use pdf_normalize::pdf::{NormalizeOptions, PageSizeNormalizer};
//! use std::path::PathBuf;
//!
//! let options = NormalizeOptions {
//!     input_path: PathBuf::from("scan.pdf"),
//!     output_path: PathBuf::from("scan-normalized.pdf"),
//!     ..Default::default()
//! };
//!
//! PageSizeNormalizer::new(options).normalize().expect("Failed to normalize PDF");
//! ```

pub mod error;
pub mod pdf;
pub mod plan;
pub mod report;
pub mod size;

// Re-export commonly used items
pub use error::{Error, Result};
pub use plan::{RenderPlan, ScaleMode};
pub use report::{PageStatus, ReportEntry};
pub use size::PageSize;
