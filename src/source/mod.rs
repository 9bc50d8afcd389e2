//! Word sources.
//!
//! A [`WordSource`] yields, per page, the page dimensions and the positioned
//! words on it. The analysis pipeline depends only on this trait, so PDFs
//! decoded with lopdf ([`PdfWordSource`]) and hand-built pages
//! ([`MemoryWordSource`]) are interchangeable.

mod content;
mod pdf;

pub use content::{collect_words, GlyphDecoder, PageGeometry};
pub use pdf::PdfWordSource;

use crate::error::{Error, Result};
use crate::model::Word;

/// The words of a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWords {
    /// Page index (0-based)
    pub index: usize,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Words in content-stream order
    pub words: Vec<Word>,
}

impl PageWords {
    /// Create an empty page with the given dimensions.
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            words: Vec::new(),
        }
    }

    /// Create an empty US Letter page (8.5 x 11 inches).
    pub fn letter(index: usize) -> Self {
        Self::new(index, 612.0, 792.0)
    }

    /// Create an empty A4 page (210 x 297 mm).
    pub fn a4(index: usize) -> Self {
        Self::new(index, 595.0, 842.0)
    }

    /// Add a word; its page index is set to this page.
    pub fn push(&mut self, mut word: Word) {
        word.page = self.index;
        self.words.push(word);
    }
}

/// Access to the positioned words of a document.
pub trait WordSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Decode one page (0-based index).
    fn page(&self, index: usize) -> Result<PageWords>;
}

/// A [`WordSource`] over pages held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWordSource {
    pages: Vec<PageWords>,
}

impl MemoryWordSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from prepared pages.
    pub fn from_pages(pages: Vec<PageWords>) -> Self {
        Self { pages }
    }

    /// Append a page, re-indexing it to its position.
    pub fn add_page(&mut self, mut page: PageWords) {
        let index = self.pages.len();
        page.index = index;
        for word in &mut page.words {
            word.page = index;
        }
        self.pages.push(page);
    }
}

impl WordSource for MemoryWordSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageWords> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }
}
