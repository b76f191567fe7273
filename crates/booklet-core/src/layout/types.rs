//! Layout data types for booklet imposition
//!
//! These types sit between the page-ordering arithmetic and PDF rendering:
//! the composer produces [`SheetSpec`]s, the renderer turns each face into
//! [`PagePlacement`]s once source page sizes are known.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;

/// Which printable side of the physical sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSide {
    /// Face A, printed first
    Front,
    /// Face B, printed on the reverse after a long-edge flip
    Back,
}

/// Which half of a face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfPosition {
    Left,
    Right,
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Source pages for both faces of one sheet, left to right.
/// `None` marks a blank filler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetOrder {
    pub front: [Option<usize>; 2],
    pub back: [Option<usize>; 2],
}

/// One half of a face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub position: HalfPosition,
    /// Source page index (None = blank)
    pub source_page: Option<usize>,
    /// Area the page is fitted into, in points
    pub bounds: Rect,
}

/// One printable side of a sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub side: FaceSide,
    /// Left slot first
    pub slots: [Slot; 2],
}

impl Face {
    pub fn left(&self) -> &Slot {
        &self.slots[0]
    }

    pub fn right(&self) -> &Slot {
        &self.slots[1]
    }

    /// Source pages left to right
    pub fn pages(&self) -> [Option<usize>; 2] {
        [self.slots[0].source_page, self.slots[1].source_page]
    }
}

/// Layout plan for one physical sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetSpec {
    pub sheet_index: usize,
    pub front: Face,
    pub back: Face,
}

impl SheetSpec {
    /// Faces in print order
    pub fn faces(&self) -> [&Face; 2] {
        [&self.front, &self.back]
    }
}

/// Final placement of a source page on an output face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub source_page: usize,
    /// Position and size of the scaled page in points
    pub content_rect: Rect,
    /// Uniform scale factor applied to the source page
    pub scale: f32,
}

/// Anything that can report page count and intrinsic page sizes
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// (width, height) in points
    fn page_size(&self, index: usize) -> (f32, f32);
}

impl PageSource for [(f32, f32)] {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_size(&self, index: usize) -> (f32, f32) {
        self.get(index).copied().unwrap_or(DEFAULT_PAGE_DIMENSIONS)
    }
}
