//! PDF rendering modules for booklet imposition
//!
//! This module handles all PDF-specific operations:
//! - Reading page boxes, rotation and inherited attributes from source pages
//! - Creating XObjects from source pages
//! - Building output faces and the final page tree

mod face;
mod xobject;

pub use face::placement_matrix;
pub(crate) use face::{finalize_document, render_face};
pub use xobject::{
    CopyCache, PageBox, copy_object_deep, create_page_xobject, inherited_attribute,
    page_media_box, page_rotation, page_visible_box,
};
