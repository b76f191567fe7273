//! Content placement within the halves of a face

use super::{Face, PagePlacement, PageSource, Rect};
use crate::constants::mm_to_pt;
use crate::types::{Margins, SheetSize};

/// Bounding boxes of the left and right halves of a face, in points.
///
/// Horizontally the left half runs from the outer margin to half the
/// center margin short of the sheet's midline; the right half mirrors it.
/// Vertically both run from the outer margin to the top minus the outer
/// margin. Margins are assumed to be validated.
pub fn half_bounds(sheet: SheetSize, margins: &Margins) -> (Rect, Rect) {
    let (width_pt, height_pt) = sheet.dimensions_pt();
    let midline = width_pt / 2.0;
    let outer = mm_to_pt(margins.outer_mm);
    let half_gap = mm_to_pt(margins.center_mm) / 2.0;
    let height = height_pt - 2.0 * outer;

    let left = Rect::new(outer, outer, midline - half_gap - outer, height);
    let right_x = midline + half_gap;
    let right = Rect::new(right_x, outer, width_pt - outer - right_x, height);

    (left, right)
}

/// Scale a source page uniformly to fit `bounds` and center it there.
pub fn fit_page(
    bounds: &Rect,
    source_page: usize,
    source_width: f32,
    source_height: f32,
) -> PagePlacement {
    let scale = fit_scale(source_width, source_height, bounds.width, bounds.height);

    let scaled_width = source_width * scale;
    let scaled_height = source_height * scale;

    let x = bounds.x + (bounds.width - scaled_width) / 2.0;
    let y = bounds.y + (bounds.height - scaled_height) / 2.0;

    PagePlacement {
        source_page,
        content_rect: Rect::new(x, y, scaled_width, scaled_height),
        scale,
    }
}

/// Placements for every non-blank slot of a face, left first.
pub fn layout_face<S>(face: &Face, source: &S) -> Vec<PagePlacement>
where
    S: PageSource + ?Sized,
{
    face.slots
        .iter()
        .filter_map(|slot| {
            let index = slot.source_page?;
            let (width, height) = source.page_size(index);
            Some(fit_page(&slot.bounds, index, width, height))
        })
        .collect()
}

/// Largest uniform scale that keeps the page inside the available area
fn fit_scale(source_width: f32, source_height: f32, avail_width: f32, avail_height: f32) -> f32 {
    if source_width <= 0.0 || source_height <= 0.0 {
        return 1.0;
    }
    (avail_width / source_width).min(avail_height / source_height)
}
