//! Outline extraction options.
//!
//! Every heuristic threshold used by the pipeline lives here so that a run
//! can be reproduced, audited, or tuned from a single value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for outline extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineOptions {
    /// Fraction of page height treated as header zone at the top and footer
    /// zone at the bottom.
    pub margin_ratio: f32,

    /// Maximum vertical-center offset, as a fraction of the line's font size,
    /// for a word to join a line.
    pub line_tolerance: f32,

    /// Maximum baseline-to-baseline distance, as a multiple of font size,
    /// for two lines to share a block.
    pub line_gap_multiplier: f32,

    /// Font size assumed when a word carries none.
    pub fallback_font_size: f32,

    /// Maximum distance of a block's midpoint from the page center, as a
    /// fraction of page width, to count as centered.
    pub centered_tolerance: f32,

    /// Case-insensitive font-name substrings that mark a bold face.
    pub bold_markers: Vec<String>,

    /// Title scoring weights.
    pub title: TitleWeights,

    /// Heading candidacy rules.
    pub headings: HeadingRules,

    /// Maximum number of heading levels (1-3).
    pub max_levels: usize,

    /// Error handling mode for per-page decoding failures.
    pub error_mode: ErrorMode,

    /// Whether batch runs process documents in parallel.
    pub parallel: bool,
}

impl OutlineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file. Missing fields take default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse options from a JSON string. Missing fields take default values.
    pub fn from_json(data: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(data).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check that thresholds are within meaningful ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..0.5).contains(&self.margin_ratio) {
            return Err(Error::Config(format!(
                "margin_ratio must be in [0, 0.5), got {}",
                self.margin_ratio
            )));
        }
        if self.line_tolerance <= 0.0 || self.line_gap_multiplier <= 0.0 {
            return Err(Error::Config(
                "line_tolerance and line_gap_multiplier must be positive".to_string(),
            ));
        }
        if self.fallback_font_size <= 0.0 {
            return Err(Error::Config(
                "fallback_font_size must be positive".to_string(),
            ));
        }
        if !(1..=3).contains(&self.max_levels) {
            return Err(Error::Config(format!(
                "max_levels must be between 1 and 3, got {}",
                self.max_levels
            )));
        }
        Ok(())
    }

    /// Set the header/footer margin ratio.
    pub fn with_margin(mut self, ratio: f32) -> Self {
        self.margin_ratio = ratio;
        self
    }

    /// Set the line gap multiplier used when grouping lines into blocks.
    pub fn with_line_gap(mut self, multiplier: f32) -> Self {
        self.line_gap_multiplier = multiplier;
        self
    }

    /// Set the centering tolerance.
    pub fn with_centered_tolerance(mut self, tolerance: f32) -> Self {
        self.centered_tolerance = tolerance;
        self
    }

    /// Replace the bold font-name markers.
    pub fn with_bold_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bold_markers = markers
            .into_iter()
            .map(|m| m.into().to_lowercase())
            .collect();
        self
    }

    /// Set the title scoring weights.
    pub fn with_title_weights(mut self, weights: TitleWeights) -> Self {
        self.title = weights;
        self
    }

    /// Set the heading rules.
    pub fn with_heading_rules(mut self, rules: HeadingRules) -> Self {
        self.headings = rules;
        self
    }

    /// Set the maximum number of heading levels (clamped to 1-3).
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels.clamp(1, 3);
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the document when any page cannot be decoded.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            margin_ratio: 0.08,
            line_tolerance: 0.3,
            line_gap_multiplier: 1.5,
            fallback_font_size: 12.0,
            centered_tolerance: 0.10,
            bold_markers: vec!["bold".into(), "black".into(), "heavy".into()],
            title: TitleWeights::default(),
            headings: HeadingRules::default(),
            max_levels: 3,
            error_mode: ErrorMode::Lenient,
            parallel: true,
        }
    }
}

/// Weights for the title score.
///
/// `score = size_weight * size / max_size + bonuses`; the best block wins
/// when its score reaches `min_score`. The default threshold sits above
/// `size_weight + top_third_bonus`, so plain text opening the first page
/// needs a bold or centered face to become the title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleWeights {
    pub size_weight: f32,
    pub bold_bonus: f32,
    pub centered_bonus: f32,
    pub top_third_bonus: f32,
    pub min_score: f32,
    /// Blocks longer than this are never considered for the title.
    pub max_words: usize,
}

impl Default for TitleWeights {
    fn default() -> Self {
        Self {
            size_weight: 1.0,
            bold_bonus: 0.25,
            centered_bonus: 0.25,
            top_third_bonus: 0.25,
            min_score: 1.3,
            max_words: 25,
        }
    }
}

/// Rules that decide whether a block is a heading candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingRules {
    /// Blocks with more words are body text.
    pub max_words: usize,
    /// A block counts as larger than body text when its size exceeds the
    /// body size by strictly more than this many points.
    pub min_size_delta: f32,
    /// Let a leading section number ("2.1", "3)") qualify a block on its own.
    pub numbered_qualifies: bool,
}

impl Default for HeadingRules {
    fn default() -> Self {
        Self {
            max_words: 12,
            min_size_delta: 0.0,
            numbered_qualifies: false,
        }
    }
}

/// Error handling mode for page decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Fail the document on any page error
    Strict,
    /// Treat undecodable pages as empty and continue
    #[default]
    Lenient,
}
