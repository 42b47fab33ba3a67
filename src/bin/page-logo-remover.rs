use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use page_logo_removal::{
    default_output_path, is_pdf, Corner, ImageSequence, ImageWriter, LogoEngine, ProcessOptions,
    ProcessOutcome, ScanSize,
};

#[derive(Parser)]
#[command(
    name = "page-logo-remover",
    about = "Remove a recurring corner logo from every page of a scanned document",
    version,
    after_help = "Input is a page image, a directory of page images (sorted by name),\n\
                  or a PDF (built with the `pdf` feature).\n\
                  The input is never modified; results go to OUTPUT (default: {name}_clean)."
)]
struct Cli {
    /// Input PDF, page image, or directory of page images
    input: String,

    /// Output file or directory (default: {name}_clean[.{ext}])
    #[arg(short, long)]
    output: Option<String>,

    /// Logo corner: auto, bottom-right, bottom-left, top-right, top-left
    #[arg(long, default_value = "auto")]
    corner: String,

    /// Size of the scanned corner window, WxH in pixels
    #[arg(long, default_value = "300x60")]
    scan_size: String,

    /// Resolution for rendering PDF pages and for the rebuilt PDF
    #[arg(long, default_value_t = 150)]
    dpi: u32,

    /// Only report detection results, write nothing
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_options(cli: &Cli) -> page_logo_removal::Result<ProcessOptions> {
    let corner = if cli.corner.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(cli.corner.parse::<Corner>()?)
    };
    Ok(ProcessOptions {
        scan_size: cli.scan_size.parse::<ScanSize>()?,
        corner,
        resolution: cli.dpi,
        dry_run: cli.dry_run,
    })
}

fn run(cli: &Cli) -> page_logo_removal::Result<ProcessOutcome> {
    let engine = LogoEngine::new(parse_options(cli)?)?;

    let input_path = Path::new(&cli.input);
    let output_path = match &cli.output {
        Some(o) => PathBuf::from(o),
        None => default_output_path(input_path),
    };

    let outcome = if is_pdf(input_path) {
        process_pdf(&engine, input_path, &output_path)?
    } else {
        let source = ImageSequence::open(input_path)?;
        let mut sink = ImageWriter::new(source.output_targets(&output_path)?);
        engine.process_document(&source, &mut sink)?
    };
    if !cli.quiet && !cli.dry_run {
        eprintln!("[DONE] {}", output_path.display());
    }
    Ok(outcome)
}

#[cfg(feature = "pdf")]
fn process_pdf(
    engine: &LogoEngine,
    input: &Path,
    output: &Path,
) -> page_logo_removal::Result<ProcessOutcome> {
    let source = page_logo_removal::PdfSource::open(input)?;
    let mut sink = page_logo_removal::PdfWriter::new(source.output_target(output)?);
    engine.process_document(&source, &mut sink)
}

#[cfg(not(feature = "pdf"))]
fn process_pdf(
    _engine: &LogoEngine,
    input: &Path,
    _output: &Path,
) -> page_logo_removal::Result<ProcessOutcome> {
    Err(page_logo_removal::Error::UnsupportedFormat(format!(
        "{}: PDF input needs a build with the `pdf` feature",
        input.display()
    )))
}

fn print_summary(outcome: &ProcessOutcome, cli: &Cli) {
    if cli.quiet {
        return;
    }

    let detection = &outcome.detection;
    let rect = detection.rect();
    eprintln!(
        "Logo: {} at {} ({} x {} px)",
        detection.corner, rect, rect.width, rect.height
    );

    for report in &outcome.reports {
        let [r, g, b] = report.background.0;
        eprintln!(
            "  page {}: {} (background RGB({r}, {g}, {b}))",
            report.page + 1,
            report.mode
        );
    }

    for warning in outcome.warnings() {
        eprintln!("[WARN] {warning}");
    }

    if cli.dry_run {
        eprintln!("Dry run: nothing written. Drop --dry-run to remove the logo.");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if !Path::new(&cli.input).exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    match run(&cli) {
        Ok(outcome) => print_summary(&outcome, &cli),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
