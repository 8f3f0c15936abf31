//! Output document construction using lopdf
//!
//! Each source page is wrapped in a Form XObject and drawn onto a fresh page
//! of the target size, so every output page has exactly the same MediaBox no
//! matter how the source page was sized, cropped or rotated.

use std::collections::HashMap;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use crate::error::{Error, Result};
use crate::plan::{PlannedPage, RenderPlan, Scale};
use crate::size::PageSize;
use super::pages::{inherited_attribute, PageGeometry};
use super::transform::placement;

/// Resource name the source page is drawn under
const SOURCE_XOBJECT: &str = "Src";

/// Builds the normalized document page by page
pub struct OutputBuilder<'a> {
    source: &'a Document,
    output: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    /// Source object id → copied object id, shared by all pages
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> OutputBuilder<'a> {
    pub fn new(source: &'a Document) -> Self {
        let mut output = Document::with_version(source.version.clone());
        let pages_id = output.new_object_id();

        Self {
            source,
            output,
            pages_id,
            page_ids: Vec::new(),
            copied: HashMap::new(),
        }
    }

    /// Append an empty page of the target size
    pub fn add_blank_page(&mut self, target: PageSize) -> ObjectId {
        let content_id = self.output.add_object(Stream::new(Dictionary::new(), Vec::new()));
        let page_id = self.add_page(target, content_id, Dictionary::new());
        log::debug!("added blank page {}", self.page_ids.len());
        page_id
    }

    /// Append a page of the target size showing `geometry`'s page under `scale`
    pub fn add_source_page(
        &mut self,
        geometry: &PageGeometry,
        scale: Scale,
        target: PageSize,
    ) -> Result<ObjectId> {
        let xobject_id = self.page_to_xobject(geometry)?;

        let visible = geometry.size();
        let matrix = placement(
            geometry.bbox,
            geometry.rotation,
            (visible.width, visible.height),
            scale,
            (target.width, target.height),
        );

        let content = format!("q\n{} cm\n/{} Do\nQ\n", matrix.to_operands(), SOURCE_XOBJECT);
        let content_id = self.output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut xobjects = Dictionary::new();
        xobjects.set(SOURCE_XOBJECT, Object::Reference(xobject_id));
        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));

        Ok(self.add_page(target, content_id, resources))
    }

    fn add_page(&mut self, target: PageSize, content_id: ObjectId, resources: Dictionary) -> ObjectId {
        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        page_dict.set("MediaBox", Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            pdf_number(target.width),
            pdf_number(target.height),
        ]));
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        let page_id = self.output.add_object(page_dict);
        self.page_ids.push(page_id);
        page_id
    }

    /// Wrap a source page's content and resources in a Form XObject
    fn page_to_xobject(&mut self, geometry: &PageGeometry) -> Result<ObjectId> {
        let source = self.source;
        let content = page_content(source, geometry.id)?;

        let mut xobject_dict = Dictionary::new();
        xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
        xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
        xobject_dict.set("FormType", Object::Integer(1));
        xobject_dict.set("BBox", Object::Array(
            geometry.bbox.iter().map(|v| pdf_number(*v)).collect(),
        ));

        if let Some(resources) = inherited_attribute(source, geometry.id, b"Resources") {
            xobject_dict.set("Resources", self.copy_object(resources)?);
        }

        Ok(self.output.add_object(Stream::new(xobject_dict, content)))
    }

    /// Deep copy an object from the source document, following references
    fn copy_object(&mut self, obj: &Object) -> Result<Object> {
        match obj {
            Object::Reference(id) => {
                if let Some(&new_id) = self.copied.get(id) {
                    return Ok(Object::Reference(new_id));
                }

                // Reserve the id first so reference cycles terminate
                let new_id = self.output.new_object_id();
                self.copied.insert(*id, new_id);

                let source = self.source;
                let copied = match source.get_object(*id) {
                    Ok(referenced) => self.copy_object(referenced)?,
                    Err(e) => {
                        log::warn!("dangling reference {:?} in page resources: {}", id, e);
                        Object::Null
                    }
                };
                self.output.objects.insert(new_id, copied);

                Ok(Object::Reference(new_id))
            }
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.copy_dictionary(dict)?)),
            Object::Array(arr) => {
                let mut new_arr = Vec::with_capacity(arr.len());
                for item in arr {
                    new_arr.push(self.copy_object(item)?);
                }
                Ok(Object::Array(new_arr))
            }
            Object::Stream(stream) => Ok(Object::Stream(Stream {
                dict: self.copy_dictionary(&stream.dict)?,
                content: stream.content.clone(),
                allows_compression: stream.allows_compression,
                start_position: None,
            })),
            _ => Ok(obj.clone()),
        }
    }

    fn copy_dictionary(&mut self, dict: &Dictionary) -> Result<Dictionary> {
        let mut new_dict = Dictionary::new();
        for (key, value) in dict.iter() {
            // A /Parent link would drag the source page tree along
            if key.as_slice() == b"Parent" {
                continue;
            }
            new_dict.set(key.clone(), self.copy_object(value)?);
        }
        Ok(new_dict)
    }

    /// Finish the page tree and catalog and hand back the document
    pub fn finish(mut self) -> Document {
        let kids: Vec<Object> = self.page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        let mut pages_object = Dictionary::new();
        pages_object.set("Type", Object::Name(b"Pages".to_vec()));
        pages_object.set("Count", Object::Integer(self.page_ids.len() as i64));
        pages_object.set("Kids", Object::Array(kids));
        self.output.objects.insert(self.pages_id, Object::Dictionary(pages_object));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(self.pages_id));
        let catalog_id = self.output.add_object(catalog);

        self.output.trailer.set("Root", Object::Reference(catalog_id));
        self.output
    }
}

/// Build the normalized document described by `plan`
///
/// `geometries` must be the source document's pages in order.
pub fn render_plan(source: &Document, geometries: &[PageGeometry], plan: &RenderPlan) -> Result<Document> {
    let mut builder = OutputBuilder::new(source);

    for page in &plan.pages {
        match *page {
            PlannedPage::Blank => {
                builder.add_blank_page(plan.target);
            }
            PlannedPage::Source { index, scale } => {
                let geometry = geometries.get(index).ok_or(Error::MissingPage(index + 1))?;
                builder.add_source_page(geometry, scale, plan.target)?;
            }
        }
    }

    Ok(builder.finish())
}

/// Whole numbers are written as integers so they read back exactly
fn pdf_number(value: f64) -> Object {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Object::Integer(value as i64)
    } else {
        Object::Real(value as f32)
    }
}

/// Concatenated, decoded content streams of a page
fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc.get_dictionary(page_id)?;
    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(Vec::new()),
    };

    let stream_ids: Vec<ObjectId> = match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            // Contents may point at an array of streams
            Object::Array(arr) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
            _ => vec![*id],
        },
        Object::Array(arr) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
        _ => Vec::new(),
    };

    let mut result = Vec::new();
    for id in stream_ids {
        if let Ok(stream) = doc.get_object(id)?.as_stream() {
            // Only an unfiltered stream may be used as is
            let data = if stream.dict.has(b"Filter") {
                stream.decompressed_content()?
            } else {
                stream.content.clone()
            };
            result.extend_from_slice(&data);
            // Streams may split tokens only at whitespace
            result.push(b'\n');
        }
    }

    Ok(result)
}
