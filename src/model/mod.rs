//! Data model for outline extraction.
//!
//! Words come from a [`WordSource`](crate::source::WordSource), are grouped
//! into [`Line`]s and [`Block`]s by the analysis stages, and end up as
//! [`OutlineEntry`] values inside the serializable [`Document`].

mod block;
mod outline;
mod word;

pub use block::{Block, Line};
pub use outline::{Document, HeadingLevel, OutlineEntry};
pub use word::{BBox, Word};
