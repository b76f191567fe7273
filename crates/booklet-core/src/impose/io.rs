//! Document I/O operations for booklet imposition

use crate::layout::PageSource;
use crate::render::{PageBox, page_rotation, page_visible_box};
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A loaded source PDF with its pages resolved in reading order
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    document: Document,
    page_ids: Vec<ObjectId>,
    visible_boxes: Vec<PageBox>,
    rotations: Vec<u16>,
}

impl SourceDocument {
    /// Wrap an already parsed document. `path` is only used in messages.
    pub fn from_document(document: Document, path: impl Into<PathBuf>) -> Self {
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        let visible_boxes = page_ids
            .iter()
            .map(|&id| page_visible_box(&document, id))
            .collect();
        let rotations = page_ids
            .iter()
            .map(|&id| page_rotation(&document, id))
            .collect();

        Self {
            path: path.into(),
            document,
            page_ids,
            visible_boxes,
            rotations,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.page_ids.get(index).copied()
    }

    /// CropBox clipped to the MediaBox, before rotation
    pub fn visible_box(&self, index: usize) -> PageBox {
        self.visible_boxes.get(index).copied().unwrap_or_default()
    }

    /// Clockwise display rotation in degrees
    pub fn rotation(&self, index: usize) -> u16 {
        self.rotations.get(index).copied().unwrap_or(0)
    }
}

impl PageSource for SourceDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Size as displayed: the visible box, turned for 90/270 rotations
    fn page_size(&self, index: usize) -> (f32, f32) {
        let visible = self.visible_box(index);
        match self.rotation(index) {
            90 | 270 => (visible.height(), visible.width()),
            _ => (visible.width(), visible.height()),
        }
    }
}

/// Load the source PDF
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<SourceDocument> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| source_unreadable(&path, e))?;

    tokio::task::spawn_blocking(move || {
        let document = Document::load_mem(&bytes).map_err(|e| source_unreadable(&path, e))?;
        if document.is_encrypted() {
            return Err(source_unreadable(&path, "document is encrypted"));
        }
        let source = SourceDocument::from_document(document, path);
        log::info!(
            "Loaded {} with {} page(s)",
            source.path().display(),
            source.page_count()
        );
        Ok(source)
    })
    .await?
}

/// Save the booklet.
///
/// Bytes go to a hidden sibling file first and are renamed over `path`
/// only once fully written; the partial file is removed on failure.
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        doc.compress();
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, BookletError>(writer)
    })
    .await??;

    let partial_path = partial_path_for(&path);
    if let Err(e) = write_then_rename(&partial_path, &path, &bytes).await {
        if let Err(cleanup) = tokio::fs::remove_file(&partial_path).await {
            log::debug!(
                "No partial file to remove at {}: {}",
                partial_path.display(),
                cleanup
            );
        }
        return Err(BookletError::DestinationUnwritable {
            path,
            reason: e.to_string(),
        });
    }

    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

async fn write_then_rename(partial: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(partial, bytes).await?;
    tokio::fs::rename(partial, path).await
}

/// `dir/name.pdf` -> `dir/.name.pdf.partial`
fn partial_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or(OsStr::new("booklet")));
    name.push(".partial");
    path.with_file_name(name)
}

fn source_unreadable(path: &Path, reason: impl ToString) -> BookletError {
    BookletError::SourceUnreadable {
        path: path.to_owned(),
        reason: reason.to_string(),
    }
}
