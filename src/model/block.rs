//! Lines and blocks reconstructed from positioned words.

use super::{BBox, Word};

/// A run of words sharing a baseline on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// The words in this line, sorted by x0
    pub words: Vec<Word>,
    /// Union of the word boxes
    pub bbox: BBox,
    /// Dominant font name
    pub font_name: String,
    /// Dominant font size
    pub font_size: f32,
    /// Page index (0-based)
    pub page: usize,
}

impl Line {
    /// Create a line from words on the same page.
    ///
    /// The dominant font is the (name, size) pair covering the most
    /// characters; ties go to the font that appears first from the left.
    /// Returns `None` for an empty word list.
    pub fn from_words(mut words: Vec<Word>) -> Option<Self> {
        let first = words.first()?;
        let page = first.page;

        words.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let bbox = words
            .iter()
            .skip(1)
            .fold(words[0].bbox, |acc, w| acc.union(&w.bbox));

        // Character weight per font, in order of first appearance
        let mut weights: Vec<(&str, f32, usize)> = Vec::new();
        for word in &words {
            let chars = word.text.chars().count();
            match weights
                .iter_mut()
                .find(|(name, size, _)| *name == word.font_name && *size == word.font_size)
            {
                Some(entry) => entry.2 += chars,
                None => weights.push((word.font_name.as_str(), word.font_size, chars)),
            }
        }

        let mut dominant = weights[0];
        for entry in &weights[1..] {
            if entry.2 > dominant.2 {
                dominant = *entry;
            }
        }
        let font_name = dominant.0.to_string();
        let font_size = dominant.1;

        Some(Self {
            words,
            bbox,
            font_name,
            font_size,
            page,
        })
    }

    /// Words joined with single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A group of consecutive lines with one font and tight spacing: a
/// paragraph, a heading, or a stray fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The lines in this block, top to bottom
    pub lines: Vec<Line>,
    /// Concatenated text with whitespace collapsed
    pub text: String,
    /// Union of the line boxes
    pub bbox: BBox,
    /// Font name shared by all lines
    pub font_name: String,
    /// Font size shared by all lines
    pub font_size: f32,
    /// Page index (0-based)
    pub page: usize,
    /// Height of the page the block sits on
    pub page_height: f32,
}

impl Block {
    /// Create a block from lines that already share a font.
    ///
    /// Returns `None` for an empty line list.
    pub fn from_lines(lines: Vec<Line>, page_height: f32) -> Option<Self> {
        let first = lines.first()?;
        let font_name = first.font_name.clone();
        let font_size = first.font_size;
        let page = first.page;
        let bbox = lines
            .iter()
            .skip(1)
            .fold(first.bbox, |acc, l| acc.union(&l.bbox));
        let text = lines
            .iter()
            .map(Line::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Some(Self {
            lines,
            text,
            bbox,
            font_name,
            font_size,
            page,
            page_height,
        })
    }

    /// Top edge as a fraction of page height (0.0 = top of page).
    pub fn relative_y(&self) -> f32 {
        if self.page_height > 0.0 {
            self.bbox.y0 / self.page_height
        } else {
            0.0
        }
    }

    /// Number of words across all lines.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether both font name and size are known.
    pub fn has_font_metadata(&self) -> bool {
        !self.font_name.is_empty() && self.font_size > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f32, font: &str, size: f32) -> Word {
        let width = text.len() as f32 * size * 0.5;
        Word::new(text, BBox::new(x0, 100.0, x0 + width, 100.0 + size), font, size, 0)
    }

    #[test]
    fn test_line_sorts_words_by_x() {
        let line = Line::from_words(vec![
            word("world", 60.0, "Helvetica", 10.0),
            word("hello", 10.0, "Helvetica", 10.0),
        ])
        .unwrap();
        assert_eq!(line.text(), "hello world");
        assert_eq!(line.bbox.x0, 10.0);
        assert_eq!(line.bbox.x1, 85.0);
    }

    #[test]
    fn test_line_dominant_font_by_characters() {
        let line = Line::from_words(vec![
            word("A", 10.0, "Helvetica-Bold", 12.0),
            word("longer", 20.0, "Helvetica", 10.0),
            word("text", 60.0, "Helvetica", 10.0),
        ])
        .unwrap();
        assert_eq!(line.font_name, "Helvetica");
        assert_eq!(line.font_size, 10.0);
    }

    #[test]
    fn test_line_dominant_font_tie_goes_left() {
        let line = Line::from_words(vec![
            word("abc", 50.0, "Times", 10.0),
            word("xyz", 10.0, "Courier", 10.0),
        ])
        .unwrap();
        assert_eq!(line.font_name, "Courier");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(Line::from_words(vec![]).is_none());
        assert!(Block::from_lines(vec![], 792.0).is_none());
    }

    #[test]
    fn test_block_text_and_position() {
        let l1 = Line::from_words(vec![word("First", 10.0, "Times", 10.0)]).unwrap();
        let mut l2 = Line::from_words(vec![word("second", 10.0, "Times", 10.0)]).unwrap();
        l2.bbox.y0 = 112.0;
        l2.bbox.y1 = 122.0;
        let block = Block::from_lines(vec![l1, l2], 800.0).unwrap();
        assert_eq!(block.text, "First second");
        assert_eq!(block.word_count(), 2);
        assert_eq!(block.bbox.y1, 122.0);
        assert!((block.relative_y() - 0.125).abs() < 1e-6);
    }
}
