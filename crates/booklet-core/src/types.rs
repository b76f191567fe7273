use crate::constants::mm_to_pt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookletError {
    #[error("Page count {page_count} is not a multiple of 4; enable padding to add blank pages")]
    InvalidPageCount { page_count: usize },
    #[error("Invalid margins: {0}")]
    InvalidMargin(String),
    #[error("Cannot read source PDF {}: {reason}", path.display())]
    SourceUnreadable { path: PathBuf, reason: String },
    #[error("Cannot write booklet to {}: {reason}", path.display())]
    DestinationUnwritable { path: PathBuf, reason: String },
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No pages to impose")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, BookletError>;

/// Physical size of an output sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl SheetSize {
    /// A4 in landscape orientation (297 × 210 mm)
    pub const A4_LANDSCAPE: SheetSize = SheetSize {
        width_mm: 297.0,
        height_mm: 210.0,
    };

    /// Sheet dimensions in points (width, height)
    pub fn dimensions_pt(self) -> (f32, f32) {
        (mm_to_pt(self.width_mm), mm_to_pt(self.height_mm))
    }
}

/// Booklet margins, in millimetres.
///
/// The center margin is the gap between the two halves of a face (it ends
/// up split across the spine after folding). The outer margin borders the
/// outward edges of the sheet on all four sides.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Margins {
    /// Gap between the left and right halves
    pub center_mm: f32,
    /// Border around the outward edges of the sheet
    pub outer_mm: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            center_mm: crate::constants::DEFAULT_CENTER_MARGIN_MM,
            outer_mm: crate::constants::DEFAULT_OUTER_MARGIN_MM,
        }
    }
}

impl Margins {
    pub fn new(center_mm: f32, outer_mm: f32) -> Self {
        Self {
            center_mm,
            outer_mm,
        }
    }

    /// Check that both halves of a face keep a positive area on `sheet`
    pub fn validate(&self, sheet: SheetSize) -> Result<()> {
        if !self.center_mm.is_finite() || !self.outer_mm.is_finite() {
            return Err(BookletError::InvalidMargin(
                "margins must be finite numbers".to_string(),
            ));
        }

        if self.center_mm < 0.0 || self.outer_mm < 0.0 {
            return Err(BookletError::InvalidMargin(format!(
                "margins cannot be negative (center {} mm, outer {} mm)",
                self.center_mm, self.outer_mm
            )));
        }

        if 2.0 * self.outer_mm + self.center_mm >= sheet.width_mm {
            return Err(BookletError::InvalidMargin(format!(
                "center {} mm plus twice the outer {} mm leaves no room on a {} mm wide sheet",
                self.center_mm, self.outer_mm, sheet.width_mm
            )));
        }

        if 2.0 * self.outer_mm >= sheet.height_mm {
            return Err(BookletError::InvalidMargin(format!(
                "outer margin {} mm leaves no room on a {} mm high sheet",
                self.outer_mm, sheet.height_mm
            )));
        }

        Ok(())
    }
}

/// Statistics about a booklet job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookletStatistics {
    /// Pages in the source document
    pub source_pages: usize,
    /// Blank pages appended to reach a multiple of 4
    pub blank_pages_added: usize,
    /// Source pages plus blanks
    pub effective_pages: usize,
    /// Physical sheets of paper
    pub output_sheets: usize,
    /// Printed faces (two per sheet), one PDF page each
    pub output_faces: usize,
}
