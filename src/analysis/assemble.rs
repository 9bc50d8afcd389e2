//! Final outline assembly.

use crate::model::{Block, Document, HeadingLevel, OutlineEntry};

/// Build the output document from the title text and leveled headings.
///
/// Headings are put in reading order (page, then top edge) with a stable
/// sort, so blocks at the same position keep their input order. Pages
/// become 1-based.
pub fn assemble(title: &str, mut headings: Vec<(&Block, HeadingLevel)>) -> Document {
    headings.sort_by(|(a, _), (b, _)| a.page.cmp(&b.page).then(a.bbox.y0.total_cmp(&b.bbox.y0)));

    let outline = headings
        .into_iter()
        .map(|(block, level)| OutlineEntry {
            level,
            text: collapse_whitespace(&block.text),
            page: u32::try_from(block.page + 1).unwrap_or(u32::MAX),
        })
        .filter(|entry| !entry.text.is_empty())
        .collect();

    Document {
        title: collapse_whitespace(title),
        outline,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
