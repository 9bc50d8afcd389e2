//! pdfoutline CLI - PDF title and heading extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{find_pdfs, process_directory_with_progress};
use pdfoutline::render::{to_json, JsonFormat};
use pdfoutline::{
    sniff_file, HeadingLevel, OutlineExtractor, OutlineOptions, PdfWordSource, WordSource,
};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract PDF titles and heading outlines to JSON", long_about = None)]
struct Cli {
    /// Input PDF file or directory of PDFs
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (for a PDF) or directory (for a directory)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract outlines for every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR", env = "PDFOUTLINE_INPUT")]
        input: PathBuf,

        /// Directory for the JSON files
        #[arg(value_name = "OUTPUT_DIR", env = "PDFOUTLINE_OUTPUT")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Process files one at a time
        #[arg(long)]
        sequential: bool,

        /// JSON file with extraction options
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Extract the outline of a single PDF
    File {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// JSON file with extraction options
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Show document information and outline statistics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch {
            input,
            output,
            compact,
            sequential,
            config,
        }) => load_options(config.as_deref()).and_then(|options| {
            let options = if sequential { options.sequential() } else { options };
            cmd_batch(&input, &output, &options, json_format(compact))
        }),
        Some(Commands::File {
            input,
            output,
            compact,
            config,
        }) => load_options(config.as_deref()).and_then(|options| {
            cmd_file(&input, output.as_deref(), &options, json_format(compact))
        }),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match cli.input {
            Some(input) if input.is_dir() => {
                let output = cli.output.unwrap_or_else(|| PathBuf::from("output"));
                cmd_batch(&input, &output, &OutlineOptions::default(), JsonFormat::Pretty)
            }
            Some(input) => cmd_file(
                &input,
                cli.output.as_deref(),
                &OutlineOptions::default(),
                JsonFormat::Pretty,
            ),
            None => {
                println!("{}", "Usage: pdfoutline <INPUT> [OUTPUT]".yellow());
                println!("       pdfoutline --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn load_options(config: Option<&Path>) -> CliResult<OutlineOptions> {
    match config {
        Some(path) => Ok(OutlineOptions::from_json_file(path)?),
        None => Ok(OutlineOptions::default()),
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    options: &OutlineOptions,
    format: JsonFormat,
) -> CliResult<()> {
    let total = find_pdfs(input)?.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = process_directory_with_progress(input, output, options, format, |outcome| {
        let name = outcome
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name);
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} files in {:.2?}",
        "Processed".green().bold(),
        report.succeeded(),
        report.outcomes.len(),
        report.elapsed
    );
    if report.failed() > 0 {
        println!("{}", "Skipped:".yellow().bold());
        for failure in report.failures() {
            println!(
                "  {} {}: {}",
                "└─".dimmed(),
                failure.input.display(),
                failure.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!("{} {}", "Output:".bold(), output.display());

    Ok(())
}

fn cmd_file(
    input: &Path,
    output: Option<&Path>,
    options: &OutlineOptions,
    format: JsonFormat,
) -> CliResult<()> {
    let source = PdfWordSource::open(input)?;
    let doc = OutlineExtractor::new(options.clone()).extract(&source)?;
    let json = to_json(&doc, format)?;

    if let Some(path) = output {
        fs::write(path, format!("{}\n", json))?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> CliResult<()> {
    let header = sniff_file(input)?;
    let source = PdfWordSource::open(input)?;
    let doc = OutlineExtractor::default().extract(&source)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), header);
    println!("{}: {}", "Pages".bold(), source.page_count());

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let title = if doc.title.is_empty() {
        "(none)".dimmed().to_string()
    } else {
        doc.title.clone()
    };
    println!("{}: {}", "Title".bold(), title);
    for level in [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3] {
        println!("{}: {}", level.as_str().bold(), doc.count_level(level));
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("License: MIT");
}
