//! Face rendering for booklet output

use super::xobject::{CopyCache, PageBox, create_page_xobject};
use crate::impose::SourceDocument;
use crate::layout::{PagePlacement, Rect};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Resource name of the font used to label placeholders
const PLACEHOLDER_FONT: &str = "FErr";
const PLACEHOLDER_FONT_SIZE: f32 = 8.0;

/// A face written to the output document
pub(crate) struct RenderedFace {
    pub page_id: ObjectId,
    /// Source pages (0-based) that could not be copied and got a placeholder
    pub failed_pages: Vec<usize>,
}

/// Render one face of a sheet to the output document.
///
/// Each placement becomes a Form XObject drawn with a scale, rotate and
/// translate matrix. A source page that cannot be copied is logged and
/// replaced by a red "Error / Page N" box. A face whose halves are both
/// blank still gets an (empty) page so fronts and backs stay paired for
/// duplex printing.
pub(crate) fn render_face(
    output: &mut Document,
    source: &SourceDocument,
    placements: &[PagePlacement],
    sheet_width_pt: f32,
    sheet_height_pt: f32,
    parent_pages_id: ObjectId,
    cache: &mut CopyCache,
) -> Result<RenderedFace> {
    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(sheet_width_pt),
            Object::Real(sheet_height_pt),
        ]),
    );

    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();
    let mut failed_pages = Vec::new();

    for (idx, placement) in placements.iter().enumerate() {
        let Some(page_id) = source.page_id(placement.source_page) else {
            log::warn!(
                "Source page {} is out of range, leaving its half blank",
                placement.source_page + 1
            );
            continue;
        };
        let visible_box = source.visible_box(placement.source_page);
        let rotation = source.rotation(placement.source_page);

        match create_page_xobject(output, source.document(), page_id, visible_box, cache) {
            Ok(xobject_id) => {
                let xobject_name = format!("P{}", idx);
                xobjects.set(xobject_name.as_bytes(), Object::Reference(xobject_id));
                content_ops.push(placement_command(
                    &xobject_name,
                    placement_matrix(placement, visible_box, rotation),
                ));
            }
            Err(e) => {
                log::warn!(
                    "Could not place source page {}: {}",
                    placement.source_page + 1,
                    e
                );
                content_ops.push(placeholder_command(
                    &placement.content_rect,
                    placement.source_page + 1,
                ));
                failed_pages.push(placement.source_page);
            }
        }
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));
    if !failed_pages.is_empty() {
        let font = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]);
        let fonts = Dictionary::from_iter(vec![(PLACEHOLDER_FONT, Object::Dictionary(font))]);
        resources.set("Font", Object::Dictionary(fonts));
    }

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(RenderedFace {
        page_id: output.add_object(page_dict),
        failed_pages,
    })
}

/// The `cm` operands `[a b c d e f]` that draw a source page's form,
/// turned by its clockwise display rotation, onto the placement's content
/// rect. The visible box's lower-left corner is cancelled first, so the
/// page as displayed lands exactly on the rect.
pub fn placement_matrix(placement: &PagePlacement, visible_box: PageBox, rotation: u16) -> [f32; 6] {
    let s = placement.scale;
    let rect = &placement.content_rect;
    let (x0, y0) = visible_box.origin();
    let x1 = x0 + visible_box.width();
    let y1 = y0 + visible_box.height();

    match rotation {
        90 => [0.0, -s, s, 0.0, rect.x - s * y0, rect.y + s * x1],
        180 => [-s, 0.0, 0.0, -s, rect.x + s * x1, rect.y + s * y1],
        270 => [0.0, s, -s, 0.0, rect.x + s * y1, rect.y - s * x0],
        _ => [s, 0.0, 0.0, s, rect.x - s * x0, rect.y - s * y0],
    }
}

fn placement_command(xobject_name: &str, [a, b, c, d, e, f]: [f32; 6]) -> String {
    format!(
        "q {} {} {} {} {} {} cm /{} Do Q\n",
        a, b, c, d, e, f, xobject_name
    )
}

/// Red outline with a centred "Error / Page N" label
fn placeholder_command(rect: &Rect, page_number: usize) -> String {
    let size = PLACEHOLDER_FONT_SIZE;
    // Helvetica glyphs average about half an em
    let line = |text: &str, baseline: f32| {
        let x = rect.center_x() - text.len() as f32 * size / 4.0;
        format!(
            "BT /{} {} Tf {} {} Td ({}) Tj ET ",
            PLACEHOLDER_FONT, size, x, baseline, text
        )
    };
    format!(
        "q 1 0 0 RG 1 0 0 rg 1 w {} {} {} {} re S {}{}Q\n",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        line("Error", rect.center_y() + size / 2.0),
        line(&format!("Page {}", page_number), rect.center_y() - size),
    )
}

/// Create pages tree and catalog, finalize document structure
pub(crate) fn finalize_document(
    output: &mut Document,
    pages_tree_id: ObjectId,
    page_refs: Vec<Object>,
) {
    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    output.trailer.set("Root", catalog_id);
}
