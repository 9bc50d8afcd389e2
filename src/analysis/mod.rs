//! The outline analysis stages.
//!
//! Each stage is a plain function over borrowed data so it can be tested in
//! isolation; [`OutlineExtractor`](crate::OutlineExtractor) chains them:
//!
//! words -> [`build_blocks`] -> [`filter_margins`] -> [`FeatureExtractor`]
//! -> [`select_title`] / [`select_headings`] -> [`assign_levels`]
//! -> [`assemble`]

mod assemble;
mod blocks;
mod features;
mod filter;
mod headings;
mod levels;
mod stats;
mod title;

pub use assemble::assemble;
pub use blocks::{build_blocks, group_lines, group_words};
pub use features::{FeatureExtractor, FeatureVector};
pub use filter::{filter_margins, in_margin_zone};
pub use headings::{is_heading_candidate, select_headings};
pub use levels::{assign_levels, FontSizePartitioner, KMeansPartitioner};
pub use stats::FontStatistics;
pub use title::{select_title, title_score, TitleChoice};
