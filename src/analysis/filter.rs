//! Header and footer exclusion.

use crate::model::Block;

/// Whether a block's top edge lies in the header or footer zone.
///
/// The zones are the top and bottom `margin` fraction of the page. A block
/// exactly on a zone boundary counts as inside the zone. Pages without a
/// positive height have no zones.
pub fn in_margin_zone(block: &Block, page_height: f32, margin: f32) -> bool {
    if page_height <= 0.0 {
        return false;
    }
    let top = block.bbox.y0;
    top <= page_height * margin || top >= page_height * (1.0 - margin)
}

/// Drop the blocks of one page that sit in the header or footer zone.
pub fn filter_margins(blocks: Vec<Block>, page_height: f32, margin: f32) -> Vec<Block> {
    let before = blocks.len();
    let kept: Vec<Block> = blocks
        .into_iter()
        .filter(|b| !in_margin_zone(b, page_height, margin))
        .collect();
    if kept.len() < before {
        log::debug!("dropped {} header/footer blocks", before - kept.len());
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Line, Word};

    fn block_at(y0: f32) -> Block {
        let word = Word::new("text", BBox::new(50.0, y0, 80.0, y0 + 10.0), "Times", 10.0, 0);
        let line = Line::from_words(vec![word]).unwrap();
        Block::from_lines(vec![line], 1000.0).unwrap()
    }

    #[test]
    fn test_header_zone_is_excluded() {
        assert!(in_margin_zone(&block_at(20.0), 1000.0, 0.08));
        assert!(!in_margin_zone(&block_at(500.0), 1000.0, 0.08));
    }

    #[test]
    fn test_footer_zone_is_excluded() {
        assert!(in_margin_zone(&block_at(950.0), 1000.0, 0.08));
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        assert!(in_margin_zone(&block_at(80.0), 1000.0, 0.08));
        assert!(in_margin_zone(&block_at(920.0), 1000.0, 0.08));
        assert!(!in_margin_zone(&block_at(80.5), 1000.0, 0.08));
    }

    #[test]
    fn test_zero_height_keeps_everything() {
        assert!(!in_margin_zone(&block_at(0.0), 0.0, 0.08));
    }

    #[test]
    fn test_filter_margins_keeps_body() {
        let kept = filter_margins(
            vec![block_at(10.0), block_at(400.0), block_at(990.0)],
            1000.0,
            0.08,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bbox.y0, 400.0);
    }
}
