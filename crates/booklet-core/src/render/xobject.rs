//! XObject creation for booklet faces
//!
//! This module handles creating Form XObjects from source PDF pages,
//! which are then placed onto output faces with transformations.

use crate::constants::{DEFAULT_PAGE_DIMENSIONS, MAX_PAGE_TREE_DEPTH};
use crate::types::{BookletError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Source object id -> id of its copy in the output document
pub type CopyCache = HashMap<ObjectId, ObjectId>;

/// A page boundary box (MediaBox or CropBox) in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Default for PageBox {
    fn default() -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: DEFAULT_PAGE_DIMENSIONS.0,
            y1: DEFAULT_PAGE_DIMENSIONS.1,
        }
    }
}

impl PageBox {
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).abs()
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).abs()
    }

    /// Lower-left corner
    pub fn origin(&self) -> (f32, f32) {
        (self.x0.min(self.x1), self.y0.min(self.y1))
    }

    /// Overlap of two boxes, `None` when they don't overlap
    pub fn intersect(&self, other: &PageBox) -> Option<PageBox> {
        let (ax, ay) = self.origin();
        let (bx, by) = other.origin();
        let clipped = PageBox {
            x0: ax.max(bx),
            y0: ay.max(by),
            x1: (ax + self.width()).min(bx + other.width()),
            y1: (ay + self.height()).min(by + other.height()),
        };
        (clipped.x1 > clipped.x0 && clipped.y1 > clipped.y0).then_some(clipped)
    }

    fn to_array(self) -> Vec<Object> {
        vec![
            Object::Real(self.x0),
            Object::Real(self.y0),
            Object::Real(self.x1),
            Object::Real(self.y1),
        ]
    }
}

// =============================================================================
// XObject Creation
// =============================================================================

/// Create a Form XObject from a source page.
///
/// Resources are deep-copied through `cache`, so fonts and images shared by
/// several source pages land in the output only once.
///
/// # Arguments
/// * `output` - The output document to add the XObject to
/// * `source` - The source document containing the page
/// * `page_id` - The object ID of the source page
/// * `visible_box` - The page's CropBox (or MediaBox), used as the form's BBox
/// * `cache` - Objects already copied into `output`
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    visible_box: PageBox,
    cache: &mut CopyCache,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let content_data = get_page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("BBox", Object::Array(visible_box.to_array()));
    xobject_dict.set("FormType", Object::Integer(1));

    // Resources may live on an ancestor Pages node
    if let Some(resources) = inherited_attribute(source, page_id, b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Stream(stream) => Ok(stream_bytes(stream)),
            Object::Array(arr) => get_concatenated_content_streams(doc, arr),
            _ => Ok(Vec::new()),
        },
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            if let Ok(stream) = doc.get_object(*id)?.as_stream() {
                result.extend_from_slice(&stream_bytes(stream));
                result.push(b'\n');
            }
        }
    }

    Ok(result)
}

fn stream_bytes(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// The output id is reserved before recursing, so reference cycles in the
/// source terminate.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut CopyCache,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            // A failed copy must not leave a cached id with no object behind it
            let copied = source
                .get_object(*id)
                .map_err(BookletError::from)
                .and_then(|referenced| copy_object_deep(output, source, referenced, cache));
            let copied = match copied {
                Ok(copied) => copied,
                Err(e) => {
                    cache.remove(id);
                    return Err(e);
                }
            };
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => {
            let new_dict = copy_dictionary(output, source, &stream.dict, cache)?;
            let mut copied = Stream::new(new_dict, stream.content.clone());
            copied.allows_compression = stream.allows_compression;
            Ok(Object::Stream(copied))
        }
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut CopyCache,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

// =============================================================================
// Page Attributes
// =============================================================================

/// Look up a page attribute, walking up the page tree for inheritable keys
/// (MediaBox, CropBox, Rotate, Resources).
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node_id = page_id;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        let dict = doc.get_dictionary(node_id).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        node_id = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

/// Get a source page's MediaBox, falling back to US Letter
pub fn page_media_box(doc: &Document, page_id: ObjectId) -> PageBox {
    page_box(doc, page_id, b"MediaBox").unwrap_or_default()
}

/// The part of a page a viewer shows: the CropBox clipped to the MediaBox,
/// or the MediaBox when there is no usable CropBox
pub fn page_visible_box(doc: &Document, page_id: ObjectId) -> PageBox {
    let media_box = page_media_box(doc, page_id);
    page_box(doc, page_id, b"CropBox")
        .and_then(|crop_box| crop_box.intersect(&media_box))
        .unwrap_or(media_box)
}

/// Clockwise display rotation in degrees: 0, 90, 180 or 270
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> u16 {
    let angle = inherited_attribute(doc, page_id, b"Rotate")
        .map(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_i64().ok())
        .unwrap_or(0);
    match angle.rem_euclid(360) {
        90 => 90,
        180 => 180,
        270 => 270,
        0 => 0,
        other => {
            log::warn!("Ignoring page rotation of {} degrees", other);
            0
        }
    }
}

fn page_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<PageBox> {
    inherited_attribute(doc, page_id, key)
        .map(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_array().ok())
        .and_then(|arr| parse_box(arr))
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn parse_box(arr: &[Object]) -> Option<PageBox> {
    if arr.len() != 4 {
        return None;
    }
    let values: Vec<f32> = arr.iter().map(extract_number).collect::<Option<_>>()?;
    let parsed = PageBox {
        x0: values[0],
        y0: values[1],
        x1: values[2],
        y1: values[3],
    };
    (parsed.width() > 0.0 && parsed.height() > 0.0).then_some(parsed)
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
