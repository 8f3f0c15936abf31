//! PDF access and page rewriting

pub mod pages;
pub mod transform;
pub mod render;
pub mod normalize;

// Re-export commonly used items
pub use pages::{open_document, page_geometries, read_page_sizes, PageGeometry};
pub use transform::TransformMatrix;
pub use render::{render_plan, OutputBuilder};
pub use normalize::{NormalizeOptions, NormalizeSummary, PageSizeNormalizer};
