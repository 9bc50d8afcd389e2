//! # pdfoutline
//!
//! Heuristic outline extraction for PDF documents.
//!
//! This library reads the positioned text of a PDF and recovers its title
//! and a three-level heading outline (H1/H2/H3 with page numbers) from
//! typography alone: font size, weight, case, position and length. No
//! embedded bookmarks or tagged structure are required.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline_from_file, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     // Extract the outline of a PDF file
//!     let doc = extract_outline_from_file("report.pdf")?;
//!
//!     // Render it as JSON
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Word source**: positioned words per page ([`PdfWordSource`] via
//!    lopdf, or [`MemoryWordSource`] for hand-built pages)
//! 2. **Blocks**: words grouped into lines and lines into same-font blocks;
//!    header and footer bands are dropped
//! 3. **Scoring**: title selection on page one, heading candidacy everywhere
//! 4. **Levels**: heading font sizes clustered with 1-D k-means into H1-H3
//!
//! Every threshold lives in [`OutlineOptions`].

pub mod analysis;
pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use analysis::{FontSizePartitioner, KMeansPartitioner};
pub use batch::{
    process_directory, process_directory_with_extractor, process_directory_with_progress,
    BatchReport, FileOutcome,
};
pub use detect::{has_pdf_extension, sniff_bytes, sniff_file, PdfHeader};
pub use error::{Error, Result};
pub use model::{BBox, Block, Document, HeadingLevel, Line, OutlineEntry, Word};
pub use options::{ErrorMode, HeadingRules, OutlineOptions, TitleWeights};
pub use pipeline::OutlineExtractor;
pub use render::JsonFormat;
pub use source::{MemoryWordSource, PageWords, PdfWordSource, WordSource};

use std::io::Read;
use std::path::Path;

/// Extract the outline of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline_from_file;
///
/// let doc = extract_outline_from_file("report.pdf").unwrap();
/// println!("{}: {} headings", doc.title, doc.outline.len());
/// ```
pub fn extract_outline_from_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    extract_outline_from_file_with_options(path, OutlineOptions::default())
}

/// Extract the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{extract_outline_from_file_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new().with_margin(0.05).strict();
/// let doc = extract_outline_from_file_with_options("report.pdf", options).unwrap();
/// ```
pub fn extract_outline_from_file_with_options<P: AsRef<Path>>(
    path: P,
    options: OutlineOptions,
) -> Result<Document> {
    let source = PdfWordSource::open(path)?;
    OutlineExtractor::new(options).extract(&source)
}

/// Extract the outline of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline_from_bytes;
///
/// let data = std::fs::read("report.pdf").unwrap();
/// let doc = extract_outline_from_bytes(&data).unwrap();
/// ```
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<Document> {
    extract_outline_from_bytes_with_options(data, OutlineOptions::default())
}

/// Extract the outline of a PDF held in memory with custom options.
pub fn extract_outline_from_bytes_with_options(
    data: &[u8],
    options: OutlineOptions,
) -> Result<Document> {
    let source = PdfWordSource::from_bytes(data)?;
    OutlineExtractor::new(options).extract(&source)
}

/// Extract the outline of a PDF from a reader.
pub fn extract_outline_from_reader<R: Read>(reader: R) -> Result<Document> {
    let source = PdfWordSource::from_reader(reader)?;
    OutlineExtractor::default().extract(&source)
}
