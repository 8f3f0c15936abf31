//! Target page size calculation
//!
//! The target size is anchored on the most common page size (after rounding)
//! and smoothed by averaging every page that lies within tolerance of it, so
//! small scanning jitter between otherwise identical pages does not matter.

use crate::error::{Error, Result};

/// Default allowed difference, in points, between "the same" page sizes
pub const DEFAULT_TOLERANCE: f64 = 0.15;

/// Number of decimals page sizes are rounded to
pub const DEFAULT_PRECISION: i32 = 2;

/// Visible page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Both dimensions rounded to `precision` decimals
    pub fn rounded(&self, precision: i32) -> Self {
        Self::new(round_to(self.width, precision), round_to(self.height, precision))
    }

    /// Whether both dimensions are within `tolerance` of `other`
    pub fn is_close_to(&self, other: &PageSize, tolerance: f64) -> bool {
        (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

/// Round to a fixed number of decimals
///
/// Rounding goes through the exact decimal expansion, so a value sitting
/// exactly halfway (612.125) rounds to the even neighbour (612.12).
pub fn round_to(value: f64, precision: i32) -> f64 {
    let decimals = precision.max(0) as usize;
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Find the most frequent page size after rounding to two decimals
///
/// When several sizes share the highest count, the one that appears first in
/// the document wins.
pub fn mode_size(sizes: &[PageSize]) -> Option<PageSize> {
    let mut counts: Vec<(PageSize, usize)> = Vec::new();

    for size in sizes {
        let key = size.rounded(DEFAULT_PRECISION);
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }

    let mut best: Option<(PageSize, usize)> = None;
    for &(key, count) in &counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((key, count));
        }
    }

    best.map(|(size, _)| size)
}

/// Average every page whose unrounded size is within `tolerance` of `mode`
pub fn average_similar(sizes: &[PageSize], mode: &PageSize, tolerance: f64) -> Result<PageSize> {
    let similar: Vec<&PageSize> = sizes
        .iter()
        .filter(|size| size.is_close_to(mode, tolerance))
        .collect();

    if similar.is_empty() {
        return Err(Error::NoSimilarPages);
    }

    let count = similar.len() as f64;
    let width = similar.iter().map(|s| s.width).sum::<f64>() / count;
    let height = similar.iter().map(|s| s.height).sum::<f64>() / count;

    Ok(PageSize::new(width, height).rounded(DEFAULT_PRECISION))
}

/// Compute the target size all pages are normalized to
///
/// An empty slice has no page to match and fails with `NoSimilarPages`;
/// callers that know the document path check for zero pages first.
pub fn compute_target_size(sizes: &[PageSize], tolerance: f64) -> Result<PageSize> {
    let mode = mode_size(sizes).ok_or(Error::NoSimilarPages)?;
    average_similar(sizes, &mode, tolerance)
}
