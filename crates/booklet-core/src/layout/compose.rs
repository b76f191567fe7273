//! The booklet composer: page order plus face geometry

use super::{Face, FaceSide, HalfPosition, SheetSpec, Slot, booklet_order, half_bounds};
use crate::types::*;

/// Plan every sheet of a booklet on A4 landscape paper.
///
/// Pure: validates the margins, pads or rejects the page count, then pairs
/// each face's source pages with the half it lands in. Zero pages yields
/// zero sheets.
pub fn compose(
    page_count: usize,
    margins: &Margins,
    pad_to_multiple_of_4: bool,
) -> Result<Vec<SheetSpec>> {
    let sheet = SheetSize::A4_LANDSCAPE;
    margins.validate(sheet)?;

    let (left, right) = half_bounds(sheet, margins);
    let face = |side: FaceSide, [left_page, right_page]: [Option<usize>; 2]| Face {
        side,
        slots: [
            Slot {
                position: HalfPosition::Left,
                source_page: left_page,
                bounds: left,
            },
            Slot {
                position: HalfPosition::Right,
                source_page: right_page,
                bounds: right,
            },
        ],
    };

    let sheets: Vec<SheetSpec> = booklet_order(page_count, pad_to_multiple_of_4)?
        .into_iter()
        .enumerate()
        .map(|(sheet_index, order)| SheetSpec {
            sheet_index,
            front: face(FaceSide::Front, order.front),
            back: face(FaceSide::Back, order.back),
        })
        .collect();

    log::debug!(
        "Composed {} sheet(s) for {} source page(s)",
        sheets.len(),
        page_count
    );

    Ok(sheets)
}
