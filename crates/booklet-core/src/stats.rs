use crate::constants::{FACES_PER_SHEET, PAGES_PER_SHEET};
use crate::layout::padded_page_count;
use crate::options::BookletOptions;
use crate::types::*;

/// Calculate statistics for a booklet of `page_count` source pages
pub fn calculate_statistics(
    page_count: usize,
    options: &BookletOptions,
) -> Result<BookletStatistics> {
    let effective_pages = padded_page_count(page_count, options.pad_to_multiple_of_4)?;
    let output_sheets = effective_pages / PAGES_PER_SHEET;

    Ok(BookletStatistics {
        source_pages: page_count,
        blank_pages_added: effective_pages - page_count,
        effective_pages,
        output_sheets,
        output_faces: output_sheets * FACES_PER_SHEET,
    })
}
