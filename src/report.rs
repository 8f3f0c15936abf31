//! Change reports written next to the normalized PDF

use std::fmt;
use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::size::{round_to, PageSize, DEFAULT_PRECISION};

/// What happened to an output page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// Source page already matched the target size
    Unchanged,
    /// Source page was scaled to the target size
    Resized,
    /// Blank page added at the requested position
    BlankInserted,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Unchanged => "unchanged",
            PageStatus::Resized => "resized",
            PageStatus::BlankInserted => "blank_inserted",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the change report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// 1-based position in the output document
    pub page: usize,
    pub original_width: f64,
    pub original_height: f64,
    pub status: PageStatus,
}

impl ReportEntry {
    pub fn new(page: usize, original: PageSize, status: PageStatus) -> Self {
        Self {
            page,
            original_width: round_to(original.width, DEFAULT_PRECISION),
            original_height: round_to(original.height, DEFAULT_PRECISION),
            status,
        }
    }
}

/// Format a dimension the way the reports print it: `100.0`, `595.28`
fn format_dimension(value: f64) -> String {
    // Debug keeps the trailing ".0" on integral values
    format!("{:?}", value)
}

/// Render the human-readable report
pub fn render_text(entries: &[ReportEntry]) -> String {
    let mut text = String::from("Report of changes:\n\n");
    for entry in entries {
        text.push_str(&format!(
            "Page {:>3}: {} x {} → {}\n",
            entry.page,
            format_dimension(entry.original_width),
            format_dimension(entry.original_height),
            entry.status
        ));
    }
    text
}

pub fn write_text_report(path: &Path, entries: &[ReportEntry]) -> std::io::Result<()> {
    fs::write(path, render_text(entries))
}

/// Write the machine-readable report (pretty-printed, 2-space indent)
pub fn write_json_report(path: &Path, entries: &[ReportEntry]) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json)
}
