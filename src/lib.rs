//! Remove a recurring corner logo from every page of a rasterized document.
//!
//! Scanned or exported documents often carry the same stamp, logo, or
//! watermark in one corner of every page. This crate finds that corner, derives
//! one bounding box from the evidence on all pages, and repaints it with the
//! locally sampled background colour. Dark blue interface elements (toolbars,
//! badges) that overlap the logo are detected and preserved.
//!
//! # Quick Start
//!
//! ```no_run
//! use page_logo_removal::{LogoEngine, ProcessOptions};
//!
//! let engine = LogoEngine::new(ProcessOptions::default()).expect("valid options");
//! let pages = vec![
//!     image::open("page-1.png").unwrap().to_rgb8(),
//!     image::open("page-2.png").unwrap().to_rgb8(),
//! ];
//! let outcome = engine.process(pages).expect("pages share one size");
//! println!("logo at {} in {}", outcome.detection.rect(), outcome.detection.corner);
//! ```
//!
//! # Pipeline
//!
//! 1. **Corner** ([`corner`]): count dark pixels in a fixed window at each
//!    corner across all pages, keep the darkest.
//! 2. **Bounds** ([`bounds`]): union the dark pixels of that window over all
//!    pages and take the tight box plus a 5px margin.
//! 3. Per page, independently:
//!    - **Background** ([`background`]): median of bright pixels just outside
//!      the box.
//!    - **Overlap** ([`overlap`]): does a dark blue interface element cover
//!      the box?
//!    - **Removal** ([`removal`]): flat fill, or a column-wise fill that
//!      stops at the interface element.
//!
//! # Feature flags
//!
//! - `cli` (default): the `page-logo-remover` binary and parallel page
//!   processing via rayon.
//! - `pdf`: `PdfSource` (PDFium rasterization at a chosen DPI) and
//!   `PdfWriter` (one multi-page PDF from the cleaned rasters).

#![deny(missing_docs)]

pub mod background;
pub mod bounds;
pub mod classify;
pub mod corner;
mod engine;
pub mod error;
pub mod geometry;
pub mod overlap;
pub mod pages;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod removal;

pub use bounds::LogoBounds;
pub use corner::CornerScores;
pub use engine::{
    CleanedPage, Detection, LogoEngine, PageReport, ProcessOptions, ProcessOutcome,
};
pub use error::{Error, Result, Warning};
pub use geometry::{Corner, Rect, ScanSize};
pub use pages::{
    default_output_path, is_pdf, is_supported_image, save_image, ImageSequence, ImageWriter,
    PageSink, PageSource,
};
#[cfg(feature = "pdf")]
pub use pdf::{PdfSource, PdfWriter};
pub use removal::RemovalMode;
