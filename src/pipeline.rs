//! End-to-end outline extraction for one document.

use std::collections::HashMap;

use crate::analysis::{
    assemble, assign_levels, build_blocks, filter_margins, select_headings, select_title,
    FeatureExtractor, FontSizePartitioner, FontStatistics, KMeansPartitioner,
};
use crate::error::Result;
use crate::model::{Block, Document};
use crate::options::{ErrorMode, OutlineOptions};
use crate::source::WordSource;

/// Runs the analysis stages over a [`WordSource`].
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{OutlineExtractor, OutlineOptions, PdfWordSource};
///
/// let source = PdfWordSource::open("report.pdf")?;
/// let doc = OutlineExtractor::new(OutlineOptions::default()).extract(&source)?;
/// println!("{} headings", doc.outline.len());
/// # Ok::<(), pdfoutline::Error>(())
/// ```
pub struct OutlineExtractor {
    options: OutlineOptions,
    partitioner: Box<dyn FontSizePartitioner>,
}

impl OutlineExtractor {
    /// Create an extractor using k-means for level assignment.
    pub fn new(options: OutlineOptions) -> Self {
        Self {
            options,
            partitioner: Box::new(KMeansPartitioner::default()),
        }
    }

    /// Replace the font-size partitioner.
    pub fn with_partitioner<P: FontSizePartitioner + 'static>(mut self, partitioner: P) -> Self {
        self.partitioner = Box::new(partitioner);
        self
    }

    /// The options this extractor runs with.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract the title and outline of a document.
    ///
    /// A page that fails to decode is skipped with a warning in lenient
    /// mode and fails the document in strict mode.
    pub fn extract<S: WordSource + ?Sized>(&self, source: &S) -> Result<Document> {
        let options = &self.options;
        let mut blocks: Vec<Block> = Vec::new();
        let mut page_widths = HashMap::new();

        for index in 0..source.page_count() {
            let page = match source.page(index) {
                Ok(page) => page,
                Err(e) => {
                    if options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to decode page {}: {}", index + 1, e);
                    continue;
                }
            };

            page_widths.insert(index, page.width);
            let page_blocks = build_blocks(page.words, page.height, options);
            let kept = filter_margins(page_blocks, page.height, options.margin_ratio);
            blocks.extend(kept);
        }
        log::debug!("{} blocks after margin filtering", blocks.len());

        let body_size = FontStatistics::from_blocks(&blocks).body_size(options.fallback_font_size);
        let extractor = FeatureExtractor::new(options, page_widths, body_size);

        let title = select_title(&blocks, &extractor, &options.title);
        let title_text = title.map(|t| blocks[t.index].text.as_str()).unwrap_or("");

        let heading_indices =
            select_headings(&blocks, &extractor, title.map(|t| t.index), &options.headings);
        let sizes: Vec<f32> = heading_indices.iter().map(|&i| blocks[i].font_size).collect();
        let levels = assign_levels(&sizes, options.max_levels, self.partitioner.as_ref());

        let headings = heading_indices
            .iter()
            .zip(levels)
            .map(|(&i, level)| (&blocks[i], level))
            .collect();

        Ok(assemble(title_text, headings))
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new(OutlineOptions::default())
    }
}

impl std::fmt::Debug for OutlineExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineExtractor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
