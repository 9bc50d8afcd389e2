//! Directory-to-directory batch processing.
//!
//! Every `*.pdf` directly inside the input directory becomes a `<stem>.json`
//! in the output directory. One bad document never stops the batch: its
//! failure is logged and recorded in the [`BatchReport`], and no output is
//! written for it.

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::Result;
use crate::model::Document;
use crate::options::OutlineOptions;
use crate::pipeline::OutlineExtractor;
use crate::render::{to_json, JsonFormat};
use crate::source::PdfWordSource;

/// Result of processing one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// The PDF that was processed
    pub input: PathBuf,
    /// The JSON file written, on success
    pub output: Option<PathBuf>,
    /// Why the file was skipped, on failure
    pub error: Option<String>,
}

impl FileOutcome {
    /// Whether the file produced output.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One outcome per input file, sorted by input path
    pub outcomes: Vec<FileOutcome>,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of files that produced output.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of files that were skipped.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Outcomes of the skipped files.
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// List the PDF files directly inside `dir`, sorted by path.
pub fn find_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Extract the outline of one PDF and write it as JSON.
///
/// Nothing is written unless extraction succeeds.
pub fn process_file<P, Q>(
    input: P,
    output: Q,
    options: &OutlineOptions,
    format: JsonFormat,
) -> Result<Document>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let extractor = OutlineExtractor::new(options.clone());
    extract_to(&extractor, input.as_ref(), output.as_ref(), format)
}

fn extract_to(
    extractor: &OutlineExtractor,
    input: &Path,
    output: &Path,
    format: JsonFormat,
) -> Result<Document> {
    let start = Instant::now();
    let source = PdfWordSource::open(input)?;
    let doc = extractor.extract(&source)?;
    let mut json = to_json(&doc, format)?;
    json.push('\n');
    fs::write(output, json)?;
    log::info!(
        "{}: {} headings in {:.2?}",
        input.display(),
        doc.outline.len(),
        start.elapsed()
    );
    Ok(doc)
}

/// Process every PDF in `input` into `output` as pretty JSON.
pub fn process_directory<P, Q>(input: P, output: Q, options: &OutlineOptions) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    process_directory_with_progress(input, output, options, JsonFormat::Pretty, |_| {})
}

/// Process every PDF in `input` into `output`, calling `on_file` after each
/// file.
///
/// Files run in parallel when `options.parallel` is set, so `on_file` may
/// be called from several threads and in any order. The returned outcomes
/// are always sorted by input path. Fails only when the input directory
/// cannot be listed or the output directory cannot be created.
pub fn process_directory_with_progress<P, Q, F>(
    input: P,
    output: Q,
    options: &OutlineOptions,
    format: JsonFormat,
    on_file: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&FileOutcome) + Sync,
{
    let extractor = OutlineExtractor::new(options.clone());
    process_directory_with_extractor(input, output, &extractor, format, on_file)
}

/// Like [`process_directory_with_progress`], with a preconfigured extractor.
///
/// A document that panics while decoding is recorded as a failure like any
/// other error; the remaining files are still processed.
pub fn process_directory_with_extractor<P, Q, F>(
    input: P,
    output: Q,
    extractor: &OutlineExtractor,
    format: JsonFormat,
    on_file: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&FileOutcome) + Sync,
{
    let start = Instant::now();
    let output = output.as_ref();
    let files = find_pdfs(input.as_ref())?;
    fs::create_dir_all(output)?;
    log::debug!("{} PDF files in {}", files.len(), input.as_ref().display());

    let run = |pdf: &PathBuf| -> FileOutcome {
        let outcome = process_one(extractor, pdf, output, format);
        on_file(&outcome);
        outcome
    };

    let mut outcomes: Vec<FileOutcome> = if extractor.options().parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };
    outcomes.sort_by(|a, b| a.input.cmp(&b.input));

    let report = BatchReport {
        outcomes,
        elapsed: start.elapsed(),
    };
    log::info!(
        "Processed {} files ({} failed) in {:.2?}",
        report.outcomes.len(),
        report.failed(),
        report.elapsed
    );
    Ok(report)
}

fn process_one(
    extractor: &OutlineExtractor,
    pdf: &Path,
    output_dir: &Path,
    format: JsonFormat,
) -> FileOutcome {
    let stem = pdf.file_stem().unwrap_or_default().to_string_lossy();
    let target = output_dir.join(format!("{}.json", stem));

    // lopdf can panic on malformed input
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        extract_to(extractor, pdf, &target, format)
    }));
    let error = match result {
        Ok(Ok(_)) => None,
        Ok(Err(e)) => Some(e.to_string()),
        Err(payload) => Some(format!("decoder panicked: {}", panic_message(payload.as_ref()))),
    };

    match error {
        None => FileOutcome {
            input: pdf.to_path_buf(),
            output: Some(target),
            error: None,
        },
        Some(e) => {
            log::error!("Skipping {}: {}", pdf.display(), e);
            FileOutcome {
                input: pdf.to_path_buf(),
                output: None,
                error: Some(e),
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
