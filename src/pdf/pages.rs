//! Page geometry extraction

use std::path::Path;
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};
use crate::size::PageSize;

/// Maximum depth followed when looking up inherited page attributes
const MAX_TREE_DEPTH: usize = 32;

/// Where a page sits and how it is displayed
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    /// Page object in the source document
    pub id: ObjectId,
    /// Visible box `[x0, y0, x1, y1]` (CropBox, falling back to MediaBox)
    pub bbox: [f64; 4],
    /// Clockwise rotation, one of 0, 90, 180, 270
    pub rotation: i64,
}

impl PageGeometry {
    /// Displayed size, with width and height swapped for quarter turns
    pub fn size(&self) -> PageSize {
        let width = self.bbox[2] - self.bbox[0];
        let height = self.bbox[3] - self.bbox[1];
        if self.rotation == 90 || self.rotation == 270 {
            PageSize::new(height, width)
        } else {
            PageSize::new(width, height)
        }
    }
}

/// Load a PDF, reporting a missing file separately from a malformed one
pub fn open_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    Document::load(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Geometry of every page, in page order
pub fn page_geometries(doc: &Document) -> Result<Vec<PageGeometry>> {
    doc.get_pages()
        .into_values()
        .map(|id| page_geometry(doc, id))
        .collect()
}

/// Geometry of a single page
pub fn page_geometry(doc: &Document, page_id: ObjectId) -> Result<PageGeometry> {
    let bbox = inherited_attribute(doc, page_id, b"CropBox")
        .and_then(|obj| rectangle(doc, obj))
        .or_else(|| inherited_attribute(doc, page_id, b"MediaBox").and_then(|obj| rectangle(doc, obj)));

    let bbox = match bbox {
        Some(bbox) => bbox,
        None => {
            log::warn!("page object {:?} has no usable MediaBox, assuming US Letter", page_id);
            let letter = PageSize::letter();
            [0.0, 0.0, letter.width, letter.height]
        }
    };

    let rotation = inherited_attribute(doc, page_id, b"Rotate")
        .and_then(extract_number)
        .map(|r| normalize_rotation(r as i64))
        .unwrap_or(0);

    Ok(PageGeometry { id: page_id, bbox, rotation })
}

/// Displayed size of every page in a PDF file
pub fn read_page_sizes(path: &Path) -> Result<Vec<PageSize>> {
    let doc = open_document(path)?;
    let sizes: Vec<PageSize> = page_geometries(&doc)?.iter().map(PageGeometry::size).collect();

    if sizes.is_empty() {
        return Err(Error::EmptyDocument(path.to_path_buf()));
    }

    Ok(sizes)
}

/// Look up a page attribute, following `/Parent` for inheritable keys
///
/// References are resolved so callers always see the direct value.
pub(crate) fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict: &Dictionary = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return resolve(doc, value);
        }
        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent_id).ok()?;
    }

    None
}

/// Follow a reference to the object it points at
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        _ => Some(obj),
    }
}

fn rectangle(doc: &Document, obj: &Object) -> Option<[f64; 4]> {
    let values = obj.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }

    let mut numbers = [0.0; 4];
    for (slot, value) in numbers.iter_mut().zip(values) {
        *slot = extract_number(resolve(doc, value)?)?;
    }

    // Corners may be given in any order
    let [ax, ay, bx, by] = numbers;
    let bbox = [ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)];
    if bbox[2] - bbox[0] <= 0.0 || bbox[3] - bbox[1] <= 0.0 {
        return None;
    }
    Some(bbox)
}

fn extract_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn normalize_rotation(rotation: i64) -> i64 {
    match rotation.rem_euclid(360) {
        r @ (90 | 180 | 270) => r,
        _ => 0,
    }
}
