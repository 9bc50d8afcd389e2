//! Title selection on the first page.

use super::features::{FeatureExtractor, FeatureVector};
use crate::model::Block;
use crate::options::TitleWeights;

/// The winning title block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleChoice {
    /// Index of the block in the slice passed to [`select_title`]
    pub index: usize,
    /// Its score
    pub score: f32,
}

/// Score a block as a title candidate.
///
/// `max_size` is the largest font size among first-page candidates.
pub fn title_score(features: &FeatureVector<'_>, max_size: f32, weights: &TitleWeights) -> f32 {
    let block = features.block;
    let mut score = if max_size > 0.0 {
        weights.size_weight * features.font_size / max_size
    } else {
        0.0
    };
    if features.is_bold {
        score += weights.bold_bonus;
    }
    if features.is_centered {
        score += weights.centered_bonus;
    }
    if block.page_height > 0.0 && block.bbox.y0 < block.page_height / 3.0 {
        score += weights.top_third_bonus;
    }
    score
}

/// Pick the title among the blocks of the first page (index 0).
///
/// Blocks on other pages, without font metadata, empty, or longer than
/// `weights.max_words` are not candidates. The highest score wins if it
/// reaches `weights.min_score`; ties go to the topmost block. Returns
/// `None` when nothing qualifies, which means an empty title.
pub fn select_title(
    blocks: &[Block],
    extractor: &FeatureExtractor<'_>,
    weights: &TitleWeights,
) -> Option<TitleChoice> {
    let candidates: Vec<(usize, FeatureVector<'_>)> = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.page == 0)
        .map(|(i, b)| (i, extractor.extract(b)))
        .filter(|(_, f)| {
            f.has_font_metadata && f.word_count > 0 && f.word_count <= weights.max_words
        })
        .collect();

    let max_size = candidates
        .iter()
        .map(|(_, f)| f.font_size)
        .fold(0.0f32, f32::max);

    let mut best: Option<(TitleChoice, f32)> = None; // (choice, y0)
    for (index, features) in &candidates {
        let score = title_score(features, max_size, weights);
        let y0 = features.block.bbox.y0;
        let better = match &best {
            None => true,
            Some((current, current_y0)) => {
                score > current.score || (score == current.score && y0 < *current_y0)
            }
        };
        if better {
            best = Some((TitleChoice { index: *index, score }, y0));
        }
    }

    let (choice, _) = best?;
    if choice.score >= weights.min_score {
        log::debug!(
            "title candidate {} scored {:.2}: {:?}",
            choice.index,
            choice.score,
            blocks[choice.index].text
        );
        Some(choice)
    } else {
        log::debug!("no title: best score {:.2} below threshold", choice.score);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Line, Word};
    use crate::options::OutlineOptions;
    use std::collections::HashMap;

    fn block(text: &str, x0: f32, y0: f32, font: &str, size: f32, page: usize) -> Block {
        let width = text.chars().count() as f32 * size * 0.5;
        let word = Word::new(text, BBox::new(x0, y0, x0 + width, y0 + size), font, size, page);
        let line = Line::from_words(vec![word]).unwrap();
        Block::from_lines(vec![line], 800.0).unwrap()
    }

    fn centered(text: &str, y0: f32, font: &str, size: f32) -> Block {
        let width = text.chars().count() as f32 * size * 0.5;
        block(text, 300.0 - width / 2.0, y0, font, size, 0)
    }

    fn run(blocks: &[Block]) -> Option<TitleChoice> {
        let options = OutlineOptions::default();
        let extractor = FeatureExtractor::new(&options, HashMap::from([(0, 600.0)]), 10.0);
        select_title(blocks, &extractor, &options.title)
    }

    #[test]
    fn test_dominant_bold_centered_block_is_title() {
        let blocks = vec![
            block("Body paragraph text", 72.0, 300.0, "Times", 10.0, 0),
            centered("Annual Report", 120.0, "Times-Bold", 24.0),
            block("More body", 72.0, 320.0, "Times", 10.0, 0),
        ];
        let choice = run(&blocks).unwrap();
        assert_eq!(choice.index, 1);
        assert!((choice.score - 1.75).abs() < 1e-6);
    }

    #[test]
    fn test_only_first_page_is_considered() {
        let blocks = vec![
            block("Body", 72.0, 300.0, "Times", 10.0, 0),
            block("Huge Later Heading", 72.0, 100.0, "Times-Bold", 30.0, 1),
        ];
        // The page-one body block is the largest there but earns only the
        // size term, which is below the threshold.
        assert!(run(&blocks).is_none());
    }

    #[test]
    fn test_tie_goes_to_topmost() {
        let blocks = vec![
            centered("Second", 200.0, "Times-Bold", 20.0),
            centered("First", 150.0, "Times-Bold", 20.0),
        ];
        let choice = run(&blocks).unwrap();
        assert_eq!(choice.index, 1);
    }

    #[test]
    fn test_long_blocks_and_missing_fonts_are_skipped() {
        let long_text = vec!["word"; 30].join(" ");
        let blocks = vec![
            centered(&long_text, 100.0, "Times-Bold", 24.0),
            centered("Untyped", 110.0, "", 24.0),
            centered("Real Title", 140.0, "Times-Bold", 18.0),
        ];
        let choice = run(&blocks).unwrap();
        assert_eq!(choice.index, 2);
    }

    #[test]
    fn test_plain_body_text_is_not_a_title() {
        let blocks = vec![
            block("Dear customer, thank you", 72.0, 100.0, "Times-Roman", 10.0, 0),
            block("for your order of last week", 72.0, 130.0, "Times-Roman", 10.0, 0),
        ];
        assert!(run(&blocks).is_none());
    }

    #[test]
    fn test_no_blocks_means_no_title() {
        assert!(run(&[]).is_none());
    }
}
