//! Booklet page ordering
//!
//! Standard 2-up saddle imposition for long-edge duplex. With `N` effective
//! pages, sheet `s` carries:
//!
//! ```text
//!            left        right
//! front:   N-1-2s         2s
//! back:      2s+1      N-2-2s
//! ```
//!
//! Stacking the printed sheets in order and folding them down the middle
//! gives pages 0..N in reading order.

use super::SheetOrder;
use crate::constants::PAGES_PER_SHEET;
use crate::types::*;

/// Page count after appending blanks to reach a multiple of 4.
///
/// Fails with [`BookletError::InvalidPageCount`] when padding is off and
/// the count does not already fold.
pub fn padded_page_count(page_count: usize, pad_to_multiple_of_4: bool) -> Result<usize> {
    let remainder = page_count % PAGES_PER_SHEET;
    if remainder == 0 {
        return Ok(page_count);
    }
    if !pad_to_multiple_of_4 {
        return Err(BookletError::InvalidPageCount { page_count });
    }
    Ok(page_count + PAGES_PER_SHEET - remainder)
}

/// Source page order for every sheet, outermost sheet first.
///
/// Indices past `page_count` are padding and come back as `None`.
pub fn booklet_order(page_count: usize, pad_to_multiple_of_4: bool) -> Result<Vec<SheetOrder>> {
    let effective = padded_page_count(page_count, pad_to_multiple_of_4)?;
    let sheets = effective / PAGES_PER_SHEET;
    let page = |index: usize| (index < page_count).then_some(index);

    Ok((0..sheets)
        .map(|s| SheetOrder {
            front: [page(effective - 1 - 2 * s), page(2 * s)],
            back: [page(2 * s + 1), page(effective - 2 - 2 * s)],
        })
        .collect())
}
