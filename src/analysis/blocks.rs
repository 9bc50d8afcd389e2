//! Block reconstruction: words -> lines -> blocks.
//!
//! Both passes are greedy single folds over sorted input. A word joins the
//! open line when its vertical center is close to the line's; a line joins
//! the open block when it has the same font and sits within a leading
//! threshold that scales with font size.

use crate::model::{Block, Line, Word};
use crate::options::OutlineOptions;

/// Group the words of one page into blocks, top to bottom.
pub fn build_blocks(words: Vec<Word>, page_height: f32, options: &OutlineOptions) -> Vec<Block> {
    let lines = group_words(words, options);
    group_lines(lines, page_height, options)
}

/// Group words into lines.
///
/// Words with blank text or a zero-width box are discarded first. The rest
/// are sorted by (top, left); a word starts a new line when its vertical
/// center is more than `line_tolerance x size` away from the center of the
/// line's first word, or when it lies on another page.
pub fn group_words(words: Vec<Word>, options: &OutlineOptions) -> Vec<Line> {
    let mut words: Vec<Word> = words.into_iter().filter(Word::is_usable).collect();
    if words.is_empty() {
        return vec![];
    }

    words.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then(a.bbox.y0.total_cmp(&b.bbox.y0))
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut anchor: Option<(usize, f32, f32)> = None; // (page, center, size)

    for word in words {
        let center = word.bbox.center_y();
        if let Some((page, line_center, line_size)) = anchor {
            let tolerance = options.line_tolerance * line_size;
            if page == word.page && (center - line_center).abs() <= tolerance {
                current.push(word);
                continue;
            }
            lines.extend(Line::from_words(std::mem::take(&mut current)));
        }
        anchor = Some((word.page, center, effective_size(word.font_size, options)));
        current.push(word);
    }
    lines.extend(Line::from_words(current));

    lines
}

/// Group consecutive lines into blocks.
///
/// A line continues the open block when its font name and size equal the
/// block's exactly, it is on the same page, and its top edge is at most
/// `line_gap_multiplier x size` below the top edge of the previous line.
pub fn group_lines(lines: Vec<Line>, page_height: f32, options: &OutlineOptions) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Vec<Line> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if !continues_block(prev, &line, options) {
                blocks.extend(Block::from_lines(std::mem::take(&mut current), page_height));
            }
        }
        current.push(line);
    }
    blocks.extend(Block::from_lines(current, page_height));

    blocks
}

fn continues_block(prev: &Line, line: &Line, options: &OutlineOptions) -> bool {
    if prev.page != line.page
        || prev.font_name != line.font_name
        || prev.font_size != line.font_size
    {
        return false;
    }
    let gap = line.bbox.y0 - prev.bbox.y0;
    gap >= 0.0 && gap <= options.line_gap_multiplier * effective_size(line.font_size, options)
}

fn effective_size(size: f32, options: &OutlineOptions) -> f32 {
    if size > 0.0 {
        size
    } else {
        options.fallback_font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn word(text: &str, x0: f32, y0: f32, font: &str, size: f32) -> Word {
        let width = text.chars().count() as f32 * size * 0.5;
        Word::new(text, BBox::new(x0, y0, x0 + width, y0 + size), font, size, 0)
    }

    #[test]
    fn test_words_on_same_baseline_form_one_line() {
        let options = OutlineOptions::default();
        let lines = group_words(
            vec![
                word("world", 80.0, 101.0, "Times", 10.0),
                word("Hello", 20.0, 100.0, "Times", 10.0),
                word("Next", 20.0, 114.0, "Times", 10.0),
            ],
            &options,
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello world");
        assert_eq!(lines[1].text(), "Next");
    }

    #[test]
    fn test_blank_and_zero_width_words_are_dropped() {
        let options = OutlineOptions::default();
        let mut flat = word("x", 20.0, 100.0, "Times", 10.0);
        flat.bbox.x1 = flat.bbox.x0;
        let lines = group_words(
            vec![flat, word("  ", 40.0, 100.0, "Times", 10.0)],
            &options,
        );
        assert!(lines.is_empty());
    }

    #[test]
    fn test_paragraph_lines_merge_into_one_block() {
        let options = OutlineOptions::default();
        let blocks = build_blocks(
            vec![
                word("First", 20.0, 100.0, "Times", 10.0),
                word("line", 60.0, 100.0, "Times", 10.0),
                word("second", 20.0, 112.0, "Times", 10.0),
                word("line", 60.0, 112.0, "Times", 10.0),
            ],
            792.0,
            &options,
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "First line second line");
        assert_eq!(blocks[0].lines.len(), 2);
    }

    #[test]
    fn test_font_change_starts_new_block() {
        let options = OutlineOptions::default();
        let blocks = build_blocks(
            vec![
                word("Heading", 20.0, 100.0, "Times-Bold", 10.0),
                word("Body", 20.0, 112.0, "Times", 10.0),
                word("Bigger", 20.0, 124.0, "Times", 11.0),
            ],
            792.0,
            &options,
        );
        let texts: Vec<_> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["Heading", "Body", "Bigger"]);
    }

    #[test]
    fn test_large_gap_starts_new_block() {
        let options = OutlineOptions::default();
        let blocks = build_blocks(
            vec![
                word("One", 20.0, 100.0, "Times", 10.0),
                word("Two", 20.0, 140.0, "Times", 10.0),
            ],
            792.0,
            &options,
        );
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_gap_threshold_scales_with_font_size() {
        let options = OutlineOptions::default();
        // 30pt leading is too loose for 10pt text but fine for 24pt text
        let small = build_blocks(
            vec![
                word("a", 20.0, 100.0, "Times", 10.0),
                word("b", 20.0, 130.0, "Times", 10.0),
            ],
            792.0,
            &options,
        );
        let large = build_blocks(
            vec![
                word("Big", 20.0, 100.0, "Times-Bold", 24.0),
                word("Title", 20.0, 130.0, "Times-Bold", 24.0),
            ],
            792.0,
            &options,
        );
        assert_eq!(small.len(), 2);
        assert_eq!(large.len(), 1);
        assert_eq!(large[0].text, "Big Title");
    }

    #[test]
    fn test_single_stray_word_is_a_block() {
        let options = OutlineOptions::default();
        let blocks = build_blocks(vec![word("Alone", 300.0, 400.0, "Times", 9.0)], 792.0, &options);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].word_count(), 1);
    }

    #[test]
    fn test_blocks_never_span_pages() {
        let options = OutlineOptions::default();
        let mut second = word("later", 20.0, 100.0, "Times", 10.0);
        second.page = 1;
        let lines = group_words(vec![word("early", 20.0, 100.0, "Times", 10.0), second], &options);
        assert_eq!(lines.len(), 2);
        let blocks = group_lines(lines, 792.0, &options);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].page, 0);
        assert_eq!(blocks[1].page, 1);
    }

    #[test]
    fn test_empty_page() {
        let options = OutlineOptions::default();
        assert!(build_blocks(vec![], 792.0, &options).is_empty());
    }
}
