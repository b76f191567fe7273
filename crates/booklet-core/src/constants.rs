//! Shared constants for booklet imposition
//!
//! This module centralizes magic numbers and constants used throughout
//! the imposition process.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Booklet Geometry
// =============================================================================

/// Source pages carried by one folded sheet (two faces, two halves each)
pub const PAGES_PER_SHEET: usize = 4;

/// Printed faces per physical sheet (front and back)
pub const FACES_PER_SHEET: usize = 2;

/// Default gap between the two halves of a face (mm)
pub const DEFAULT_CENTER_MARGIN_MM: f32 = 10.0;

/// Default border around the outward edges of the sheet (mm)
pub const DEFAULT_OUTER_MARGIN_MM: f32 = 5.0;

// =============================================================================
// Source Pages
// =============================================================================

/// Fallback page width in points when a page has no usable MediaBox (US Letter)
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Fallback page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Fallback page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

/// Upper bound on page-tree depth when looking up inherited attributes
pub const MAX_PAGE_TREE_DEPTH: usize = 32;

// =============================================================================
// Output
// =============================================================================

/// Suffix added to the input file stem when no output path is given
pub const BOOKLET_FILE_SUFFIX: &str = "_booklet_landscape";

/// PDF version written to the output document
pub const OUTPUT_PDF_VERSION: &str = "1.7";
