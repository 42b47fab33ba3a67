//! Error and warning types for the page-logo-removal crate.

use std::fmt;
use std::path::PathBuf;

/// Errors that abort a document run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source document is missing, unreadable, or holds no pages.
    #[error("input unavailable: {}: {reason}", .path.display())]
    InputUnavailable {
        /// Path that could not be read.
        path: PathBuf,
        /// Why it could not be read.
        reason: String,
    },

    /// Detection was asked to run over zero pages.
    #[error("document has no pages")]
    EmptyDocument,

    /// A page raster has zero width or height.
    #[error("page {0} has no pixels")]
    EmptyPage(usize),

    /// A page does not share the dimensions of the first page.
    #[error(
        "page {page} is {}x{}, expected {}x{}",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    PageSizeMismatch {
        /// Zero-based index of the offending page.
        page: usize,
        /// Dimensions of the first page.
        expected: (u32, u32),
        /// Dimensions of the offending page.
        actual: (u32, u32),
    },

    /// A scan window size could not be parsed or is zero.
    #[error("invalid scan size: {0} (expected WxH, e.g. 300x60)")]
    InvalidScanSize(String),

    /// A corner name could not be parsed.
    #[error("invalid corner: {0} (expected bottom-right, bottom-left, top-right or top-left)")]
    InvalidCorner(String),

    /// The rendering resolution must be a positive DPI value.
    #[error("invalid resolution: {0} DPI")]
    InvalidResolution(u32),

    /// Writing would replace one of the source rasters.
    #[error("refusing to overwrite input: {}", .0.display())]
    OutputOverwritesInput(PathBuf),

    /// The compositor was handed a different number of pages than it has targets.
    #[error("expected {expected} pages, got {actual}")]
    PageCountMismatch {
        /// Number of output targets.
        expected: usize,
        /// Number of pages supplied.
        actual: usize,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image decoding or encoding.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// PDF rendering or assembly failed.
    #[error("PDF error: {0}")]
    Pdf(String),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Degraded-but-safe conditions that do not stop processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// No dark pixel was found in the scan window on any page; the whole
    /// window is used as the logo bounds.
    NoArtifactDetected,
    /// No bright pixel was found around the bounds on this page; the pixel at
    /// the bounds' top-left corner was used as the background colour.
    BackgroundSampleExhausted {
        /// Zero-based page index.
        page: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoArtifactDetected => {
                write!(f, "no logo pixels detected, using the full scan window")
            }
            Self::BackgroundSampleExhausted { page } => write!(
                f,
                "page {}: no bright background samples, using the bounds corner pixel",
                page + 1
            ),
        }
    }
}
