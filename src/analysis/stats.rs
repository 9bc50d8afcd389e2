//! Document-wide font statistics.

use std::collections::BTreeMap;

use crate::model::Block;

/// Font size histogram for body-size estimation.
///
/// Sizes are bucketed to 0.1 pt and weighted by word count, so the body
/// size is the size most of the document's words are set in rather than the
/// size most blocks use.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Word count per font size bucket (size x 10)
    pub size_histogram: BTreeMap<i32, usize>,
    total: usize,
}

impl FontStatistics {
    /// Collect statistics over blocks. Blocks without font metadata are
    /// ignored.
    pub fn from_blocks<'a, I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let mut stats = Self::default();
        for block in blocks {
            if block.has_font_metadata() {
                stats.add_size(block.font_size, block.word_count());
            }
        }
        stats
    }

    /// Add `weight` observations of a font size.
    pub fn add_size(&mut self, size: f32, weight: usize) {
        if weight == 0 {
            return;
        }
        let key = (size * 10.0).round() as i32;
        *self.size_histogram.entry(key).or_insert(0) += weight;
        self.total += weight;
    }

    /// Total number of observations.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Weighted median font size (lower median), or `None` without data.
    pub fn median_size(&self) -> Option<f32> {
        if self.total == 0 {
            return None;
        }
        let target = (self.total + 1) / 2;
        let mut seen = 0;
        for (key, count) in &self.size_histogram {
            seen += count;
            if seen >= target {
                return Some(*key as f32 / 10.0);
            }
        }
        None
    }

    /// Body font size: the weighted median, or `fallback` without data.
    pub fn body_size(&self, fallback: f32) -> f32 {
        self.median_size().unwrap_or(fallback)
    }

    /// Number of distinct size buckets.
    pub fn distinct_sizes(&self) -> usize {
        self.size_histogram.len()
    }
}
