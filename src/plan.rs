//! Output page sequence for a normalization run
//!
//! Planning is kept apart from PDF writing so the page bookkeeping (blank page
//! insertion, per-page disposition and report ordinals) can be checked without
//! touching any document.

use crate::report::{PageStatus, ReportEntry};
use crate::size::PageSize;

/// How resized pages are fitted onto the target canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// Scale each axis independently to fill the canvas exactly
    #[default]
    Stretch,
    /// Scale uniformly to fit inside the canvas and centre the result
    Fit,
}

/// Per-axis scale factors applied to a source page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub fn identity() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    /// Scale factors that take `source` to `target` under `mode`
    pub fn between(source: &PageSize, target: &PageSize, mode: ScaleMode) -> Self {
        let x = target.width / source.width;
        let y = target.height / source.height;
        match mode {
            ScaleMode::Stretch => Self { x, y },
            ScaleMode::Fit => {
                let uniform = x.min(y);
                Self { x: uniform, y: uniform }
            }
        }
    }
}

/// One page of the output document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlannedPage {
    /// Empty page of the target size
    Blank,
    /// Source page `index` (0-based) drawn onto the target canvas
    Source { index: usize, scale: Scale },
}

/// Everything the renderer needs to build the output document
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub target: PageSize,
    pub pages: Vec<PlannedPage>,
    pub entries: Vec<ReportEntry>,
}

impl RenderPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Walk the source pages in order and decide what each output page is
///
/// `insert_blank_at` is a 0-based position in the output document. A blank
/// page requested at the source page count is appended after the last page;
/// any later position is ignored with a warning.
pub fn plan_pages(
    sizes: &[PageSize],
    target: PageSize,
    insert_blank_at: Option<usize>,
    tolerance: f64,
    mode: ScaleMode,
) -> RenderPlan {
    let insert_blank_at = insert_blank_at.filter(|&index| {
        let reachable = index <= sizes.len();
        if !reachable {
            log::warn!(
                "blank page position {} is past the end of a {}-page document, not inserting",
                index + 1,
                sizes.len()
            );
        }
        reachable
    });

    let mut pages = Vec::with_capacity(sizes.len() + 1);
    let mut entries = Vec::with_capacity(sizes.len() + 1);
    let mut page_offset = 0;

    for (i, size) in sizes.iter().enumerate() {
        let current_page_index = i + page_offset;

        if insert_blank_at == Some(current_page_index) {
            pages.push(PlannedPage::Blank);
            entries.push(ReportEntry::new(current_page_index + 1, target, PageStatus::BlankInserted));
            page_offset += 1;
        }

        let (scale, status) = if size.is_close_to(&target, tolerance) {
            (Scale::identity(), PageStatus::Unchanged)
        } else {
            (Scale::between(size, &target, mode), PageStatus::Resized)
        };

        log::debug!(
            "page {}: {:.2} x {:.2} -> {} (scale {:.4}, {:.4})",
            i + 1,
            size.width,
            size.height,
            status,
            scale.x,
            scale.y
        );

        pages.push(PlannedPage::Source { index: i, scale });
        entries.push(ReportEntry::new(i + page_offset + 1, *size, status));
    }

    if insert_blank_at == Some(sizes.len() + page_offset) {
        pages.push(PlannedPage::Blank);
        entries.push(ReportEntry::new(pages.len(), target, PageStatus::BlankInserted));
    }

    RenderPlan { target, pages, entries }
}
