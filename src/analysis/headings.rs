//! Heading candidate filtering.

use super::features::{FeatureExtractor, FeatureVector};
use crate::model::Block;
use crate::options::HeadingRules;

/// Whether a block's features qualify it as a heading.
///
/// Hard requirements: known font, some letters, at most `max_words` words,
/// not a table-of-contents line. Then at least one typographic signal:
/// bold face, larger than body text, all caps, or (when enabled) a leading
/// section number.
pub fn is_heading_candidate(
    features: &FeatureVector<'_>,
    body_size: f32,
    rules: &HeadingRules,
) -> bool {
    if !features.has_font_metadata
        || features.is_numeric_only
        || features.word_count == 0
        || features.word_count > rules.max_words
        || features.looks_like_toc_entry
    {
        return false;
    }

    // Compare at the precision the body size was measured with
    let size = (features.font_size * 10.0).round() / 10.0;
    let larger = size > body_size + rules.min_size_delta;

    features.is_bold
        || larger
        || features.is_all_caps
        || (features.starts_with_number && rules.numbered_qualifies)
}

/// Indices of the blocks that qualify as headings, in input order.
///
/// The title block, if any, is skipped by index so a heading that repeats
/// the title's text is still kept.
pub fn select_headings(
    blocks: &[Block],
    extractor: &FeatureExtractor<'_>,
    title_index: Option<usize>,
    rules: &HeadingRules,
) -> Vec<usize> {
    let body_size = extractor.body_size();
    let selected: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != title_index)
        .filter(|(_, block)| is_heading_candidate(&extractor.extract(block), body_size, rules))
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "{} of {} blocks are heading candidates (body size {:.1})",
        selected.len(),
        blocks.len(),
        body_size
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Line, Word};
    use crate::options::OutlineOptions;
    use std::collections::HashMap;

    fn block(text: &str, font: &str, size: f32) -> Block {
        let mut x = 72.0;
        let words = text
            .split_whitespace()
            .map(|t| {
                let width = t.chars().count() as f32 * size * 0.5;
                let bbox = BBox::new(x, 200.0, x + width, 200.0 + size);
                let word = Word::new(t, bbox, font, size, 0);
                x += width + size * 0.25;
                word
            })
            .collect();
        let line = Line::from_words(words).unwrap();
        Block::from_lines(vec![line], 792.0).unwrap()
    }

    fn qualifies(block: &Block, options: &OutlineOptions) -> bool {
        let extractor = FeatureExtractor::new(options, HashMap::from([(0, 612.0)]), 10.0);
        is_heading_candidate(&extractor.extract(block), 10.0, &options.headings)
    }

    #[test]
    fn test_typographic_signals() {
        let options = OutlineOptions::default();
        assert!(qualifies(&block("Introduction", "Times-Bold", 10.0), &options));
        assert!(qualifies(&block("Introduction", "Times", 14.0), &options));
        assert!(qualifies(&block("INTRODUCTION", "Times", 10.0), &options));
        assert!(!qualifies(&block("Introduction", "Times", 10.0), &options));
    }

    #[test]
    fn test_size_within_rounding_is_not_larger() {
        let options = OutlineOptions::default();
        assert!(!qualifies(&block("Introduction", "Times", 10.04), &options));
    }

    #[test]
    fn test_long_bold_block_is_rejected() {
        let options = OutlineOptions::default();
        let text = vec!["lorem"; 40].join(" ");
        assert!(!qualifies(&block(&text, "Times-Bold", 14.0), &options));
    }

    #[test]
    fn test_toc_line_is_rejected() {
        let options = OutlineOptions::default();
        assert!(!qualifies(&block("Table of Contents.......12", "Times-Bold", 14.0), &options));
    }

    #[test]
    fn test_missing_font_and_numbers_are_rejected() {
        let options = OutlineOptions::default();
        assert!(!qualifies(&block("Introduction", "", 14.0), &options));
        assert!(!qualifies(&block("42", "Times-Bold", 14.0), &options));
    }

    #[test]
    fn test_numbering_only_counts_when_enabled() {
        let plain = block("2.1 Background", "Times", 10.0);
        let options = OutlineOptions::default();
        assert!(!qualifies(&plain, &options));

        let mut options = OutlineOptions::default();
        options.headings.numbered_qualifies = true;
        assert!(qualifies(&plain, &options));
    }

    #[test]
    fn test_select_skips_title_by_index() {
        let options = OutlineOptions::default();
        let extractor = FeatureExtractor::new(&options, HashMap::from([(0, 612.0)]), 10.0);
        let blocks = vec![
            block("Overview", "Times-Bold", 20.0),
            block("plain body text", "Times", 10.0),
            block("Overview", "Times-Bold", 20.0),
        ];
        assert_eq!(select_headings(&blocks, &extractor, Some(0), &options.headings), vec![2]);
        assert_eq!(select_headings(&blocks, &extractor, None, &options.headings), vec![0, 2]);
    }
}
