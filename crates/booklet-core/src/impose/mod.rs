//! Booklet imposition - turning a source PDF into printable faces
//!
//! This module orchestrates the imposition process:
//! 1. Load the source document
//! 2. Compose the sheet plan (page order and half bounds)
//! 3. Fit each source page into its half
//! 4. Render every face to the output PDF, front then back

mod io;

pub use io::{SourceDocument, load_pdf, save_pdf};

use crate::constants::OUTPUT_PDF_VERSION;
use crate::layout::{FaceSide, PageSource, SheetSpec, compose, layout_face};
use crate::options::BookletOptions;
use crate::render::{CopyCache, finalize_document, render_face};
use crate::types::*;
use lopdf::{Document, Object};
use std::fmt;

/// Progress after rendering one output face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceProgress {
    /// Faces rendered so far (1-based)
    pub current: usize,
    /// Faces in the whole booklet
    pub total: usize,
    pub side: FaceSide,
    /// Source page indices on the face, left to right (None = blank)
    pub pages: [Option<usize>; 2],
    /// Like `pages`, but only the source pages that could not be copied and
    /// were drawn as an error placeholder instead
    pub failed_pages: [Option<usize>; 2],
}

impl FaceProgress {
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.current * 100 / self.total
        }
    }
}

impl fmt::Display for FaceProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = |page: Option<usize>| match page {
            Some(index) => (index + 1).to_string(),
            None => "blank".to_string(),
        };
        write!(
            f,
            "Output page {}/{} (input {} | {})",
            self.current,
            self.total,
            label(self.pages[0]),
            label(self.pages[1])
        )
    }
}

/// Main imposition function
pub async fn impose(source: SourceDocument, options: &BookletOptions) -> Result<Document> {
    impose_with_progress(source, options, |_| {}).await
}

/// Impose, reporting each rendered face to `progress`.
///
/// The plan is composed and validated before any rendering starts, so a
/// bad page count or margin never produces a partial document.
pub async fn impose_with_progress<F>(
    source: SourceDocument,
    options: &BookletOptions,
    progress: F,
) -> Result<Document>
where
    F: FnMut(FaceProgress) + Send + 'static,
{
    if source.page_count() == 0 {
        return Err(BookletError::NoPages);
    }

    let sheets = compose(
        source.page_count(),
        &options.margins,
        options.pad_to_multiple_of_4,
    )?;

    tokio::task::spawn_blocking(move || impose_sync(&source, &sheets, progress)).await?
}

fn impose_sync<F>(source: &SourceDocument, sheets: &[SheetSpec], mut progress: F) -> Result<Document>
where
    F: FnMut(FaceProgress),
{
    let (sheet_width_pt, sheet_height_pt) = SheetSize::A4_LANDSCAPE.dimensions_pt();

    let mut output = Document::with_version(OUTPUT_PDF_VERSION);
    let pages_tree_id = output.new_object_id();
    let mut cache = CopyCache::new();

    let total = sheets.len() * 2;
    let mut page_refs = Vec::with_capacity(total);

    for sheet in sheets {
        for face in sheet.faces() {
            let placements = layout_face(face, source);
            let rendered = render_face(
                &mut output,
                source,
                &placements,
                sheet_width_pt,
                sheet_height_pt,
                pages_tree_id,
                &mut cache,
            )?;
            page_refs.push(Object::Reference(rendered.page_id));

            let failed_pages = face
                .pages()
                .map(|page| page.filter(|p| rendered.failed_pages.contains(p)));

            let update = FaceProgress {
                current: page_refs.len(),
                total,
                side: face.side,
                pages: face.pages(),
                failed_pages,
            };
            log::debug!("{}", update);
            progress(update);
        }
    }

    finalize_document(&mut output, pages_tree_id, page_refs);
    Ok(output)
}
