//! Per-block feature extraction.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::Block;
use crate::options::OutlineOptions;

/// Horizontal gap, in ems, that separates a TOC page number from its entry.
const TOC_GAP_EMS: f32 = 3.0;

/// Stylistic, positional and content features of one block.
///
/// Borrows the block it describes; it is recomputed whenever needed and
/// never outlives the run that produced the block.
#[derive(Debug, Clone, Copy)]
pub struct FeatureVector<'a> {
    pub block: &'a Block,
    pub font_size: f32,
    pub is_bold: bool,
    pub is_all_caps: bool,
    pub is_centered: bool,
    pub word_count: usize,
    pub starts_with_number: bool,
    pub looks_like_toc_entry: bool,
    /// Both font name and size are known
    pub has_font_metadata: bool,
    /// Text is only digits and punctuation (e.g., a bare page number)
    pub is_numeric_only: bool,
}

/// Computes [`FeatureVector`]s against document-wide context.
#[derive(Debug, Clone)]
pub struct FeatureExtractor<'o> {
    options: &'o OutlineOptions,
    page_widths: HashMap<usize, f32>,
    body_size: f32,
}

impl<'o> FeatureExtractor<'o> {
    /// Create an extractor.
    ///
    /// `page_widths` maps page index to page width; `body_size` is the
    /// document's body font size.
    pub fn new(
        options: &'o OutlineOptions,
        page_widths: HashMap<usize, f32>,
        body_size: f32,
    ) -> Self {
        Self {
            options,
            page_widths,
            body_size,
        }
    }

    /// The body font size this extractor compares against.
    pub fn body_size(&self) -> f32 {
        self.body_size
    }

    /// Width of a page, if known.
    pub fn page_width(&self, page: usize) -> Option<f32> {
        self.page_widths.get(&page).copied()
    }

    /// Compute the features of one block.
    pub fn extract<'a>(&self, block: &'a Block) -> FeatureVector<'a> {
        let text = block.text.trim();
        FeatureVector {
            block,
            font_size: block.font_size,
            is_bold: is_bold_font(&block.font_name, &self.options.bold_markers),
            is_all_caps: is_all_caps(text),
            is_centered: self.is_centered(block),
            word_count: block.word_count(),
            starts_with_number: starts_with_number(text),
            looks_like_toc_entry: looks_like_toc_entry(text) || has_detached_page_number(block),
            has_font_metadata: block.has_font_metadata(),
            is_numeric_only: is_numeric_only(text),
        }
    }

    fn is_centered(&self, block: &Block) -> bool {
        match self.page_width(block.page) {
            Some(width) if width > 0.0 => {
                (block.bbox.center_x() - width / 2.0).abs()
                    <= width * self.options.centered_tolerance
            }
            _ => false,
        }
    }
}

/// Whether a font name contains one of the bold markers (case-insensitive).
pub fn is_bold_font(font_name: &str, markers: &[String]) -> bool {
    let lower = font_name.to_lowercase();
    markers
        .iter()
        .any(|m| !m.is_empty() && lower.contains(&m.to_lowercase()))
}

/// Whether all letters are upper-case and there is at least one letter.
pub fn is_all_caps(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| c.is_uppercase())
}

/// Whether the text opens with a section number such as `2.1`, `3)`,
/// `1.2.3.` or `4 Results`.
pub fn starts_with_number(text: &str) -> bool {
    static NUMBERING: OnceLock<Regex> = OnceLock::new();
    NUMBERING
        .get_or_init(|| {
            Regex::new(r"^(?:(?:\d+[.)])+\d*(?:\s|$)|\d+(?:\.\d+)+(?:\s|$)|\d+\s+\S)")
                .expect("valid numbering pattern")
        })
        .is_match(text.trim_start())
}

/// Whether the text looks like a table-of-contents line: a run of leader
/// dots, or a trailing page number after spaced dots.
///
/// Block text is joined with single spaces, so a page number set off by a
/// wide gap is detected from word positions instead.
pub fn looks_like_toc_entry(text: &str) -> bool {
    static LEADERS: OnceLock<Regex> = OnceLock::new();
    LEADERS
        .get_or_init(|| {
            Regex::new(r"\.{3,}|\x{2026}{2,}|(?:\.\s+){2,}\.?\s*\d+\s*$")
                .expect("valid leader pattern")
        })
        .is_match(text)
}

/// Whether the block's last word is a number set far to the right of the
/// text before it, as in a TOC line without leader dots.
fn has_detached_page_number(block: &Block) -> bool {
    let Some(line) = block.lines.last() else {
        return false;
    };
    let [.., prev, last] = line.words.as_slice() else {
        return false;
    };
    let gap = last.bbox.x0 - prev.bbox.x1;
    last.text.chars().all(|c| c.is_ascii_digit()) && gap > TOC_GAP_EMS * line.font_size.max(1.0)
}

/// Whether the text has no letters at all (page numbers, dates like 2024).
pub fn is_numeric_only(text: &str) -> bool {
    !text.is_empty()
        && text.chars().any(|c| c.is_ascii_digit())
        && !text.chars().any(char::is_alphabetic)
}
