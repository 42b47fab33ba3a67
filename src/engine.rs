//! Two-phase logo removal pipeline.
//!
//! Phase one looks at every page at once and fixes the corner and the logo
//! bounds. Phase two cleans each page on its own, reading only that page and
//! the shared [`Detection`].

use image::{Rgb, RgbImage};

use crate::background::sample_background;
use crate::bounds::{check_pages, find_logo_bounds, LogoBounds};
use crate::corner::{locate_corner, CornerScores};
use crate::error::{Error, Result, Warning};
use crate::geometry::{Corner, Rect, ScanSize};
use crate::overlap::has_overlapping_ui;
use crate::pages::{PageSink, PageSource};
use crate::removal::{remove_logo, RemovalMode};

/// Options controlling logo detection and removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Size of the window scanned at each corner.
    pub scan_size: ScanSize,
    /// Corner holding the logo; `None` locates it automatically.
    pub corner: Option<Corner>,
    /// Rendering resolution requested from the page source, in DPI.
    pub resolution: u32,
    /// Detect only; leave every page untouched.
    pub dry_run: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            scan_size: ScanSize::default(),
            corner: None,
            resolution: 150,
            dry_run: false,
        }
    }
}

impl ProcessOptions {
    /// Check that the scan size and resolution are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScanSize`] for a zero window dimension and
    /// [`Error::InvalidResolution`] for a zero DPI.
    pub fn validate(&self) -> Result<()> {
        if self.scan_size.width == 0 || self.scan_size.height == 0 {
            return Err(Error::InvalidScanSize(self.scan_size.to_string()));
        }
        if self.resolution == 0 {
            return Err(Error::InvalidResolution(self.resolution));
        }
        Ok(())
    }
}

/// Document-wide detection result, shared read-only by every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    /// Corner the logo is anchored to.
    pub corner: Corner,
    /// Per-corner scores, when the corner was located automatically.
    pub scores: Option<CornerScores>,
    /// Scan window and logo bounds at `corner`.
    pub bounds: LogoBounds,
}

impl Detection {
    /// The region erased on every page.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.bounds.rect
    }

    /// The scan window the bounds were found in.
    #[must_use]
    pub fn window(&self) -> Rect {
        self.bounds.window
    }
}

/// What was done to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageReport {
    /// Zero-based page index.
    pub page: usize,
    /// Strategy used to erase the bounds.
    pub mode: RemovalMode,
    /// Background colour painted over the logo.
    pub background: Rgb<u8>,
    /// Bright samples the background colour was estimated from.
    pub background_samples: usize,
    /// Whether an interface element overlapped the bounds.
    pub ui_overlap: bool,
    /// Set when background sampling fell back to the bounds corner pixel.
    pub warning: Option<Warning>,
}

/// A cleaned page raster and its report.
#[derive(Debug, Clone)]
pub struct CleanedPage {
    /// The page with the logo bounds erased.
    pub image: RgbImage,
    /// How the page was cleaned.
    pub report: PageReport,
}

/// Result of running the pipeline over one document.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// The shared detection.
    pub detection: Detection,
    /// Output pages, in order; untouched in dry-run mode.
    pub pages: Vec<RgbImage>,
    /// Per-page reports; empty in dry-run mode.
    pub reports: Vec<PageReport>,
}

impl ProcessOutcome {
    /// Every non-fatal condition hit during the run.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        self.detection
            .bounds
            .warning
            .into_iter()
            .chain(self.reports.iter().filter_map(|r| r.warning))
            .collect()
    }
}

/// The logo removal engine.
///
/// Create once per set of options and reuse for any number of documents.
#[derive(Debug, Clone)]
pub struct LogoEngine {
    options: ProcessOptions,
}

impl LogoEngine {
    /// Create an engine after validating `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if [`ProcessOptions::validate`] rejects the options.
    pub fn new(options: ProcessOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options this engine runs with.
    #[must_use]
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Locate the corner (unless configured) and the shared logo bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDocument`] for no pages, [`Error::EmptyPage`] for
    /// zero-sized rasters, and [`Error::PageSizeMismatch`] when pages differ
    /// in size.
    pub fn detect(&self, pages: &[RgbImage]) -> Result<Detection> {
        check_pages(pages)?;
        let size = self.options.scan_size;

        let (corner, scores) = match self.options.corner {
            Some(corner) => {
                tracing::info!(corner = %corner, "Using configured logo corner");
                (corner, None)
            }
            None => {
                let (corner, scores) = locate_corner(pages, size);
                (corner, Some(scores))
            }
        };

        let bounds = find_logo_bounds(pages, corner, size)?;
        Ok(Detection {
            corner,
            scores,
            bounds,
        })
    }

    /// Erase the logo on one page.
    ///
    /// `index` only labels the report and log events.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn clean_page(&self, index: usize, page: &RgbImage, detection: &Detection) -> CleanedPage {
        let rect = detection.rect();
        let background = sample_background(page, rect, detection.corner);
        let ui_overlap = has_overlapping_ui(page, rect);
        let mode = if ui_overlap {
            RemovalMode::Protective
        } else {
            RemovalMode::Simple
        };

        let warning = background.is_fallback().then(|| {
            let warning = Warning::BackgroundSampleExhausted { page: index };
            tracing::warn!(page = index + 1, "{warning}");
            warning
        });

        let image = remove_logo(page, rect, background.color, detection.corner, mode);
        tracing::debug!(
            page = index + 1,
            samples = background.samples,
            "Sampled background"
        );
        tracing::info!(
            page = index + 1,
            mode = %mode,
            background = ?background.color.0,
            "Removed logo"
        );

        CleanedPage {
            image,
            report: PageReport {
                page: index,
                mode,
                background: background.color,
                background_samples: background.samples,
                ui_overlap,
                warning,
            },
        }
    }

    /// Clean every page against the same detection.
    ///
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon);
    /// the output is identical either way.
    #[must_use]
    pub fn clean_pages(&self, pages: &[RgbImage], detection: &Detection) -> Vec<CleanedPage> {
        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            pages
                .par_iter()
                .enumerate()
                .map(|(i, page)| self.clean_page(i, page, detection))
                .collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            pages
                .iter()
                .enumerate()
                .map(|(i, page)| self.clean_page(i, page, detection))
                .collect()
        }
    }

    /// Run detection and, unless dry-run, removal over in-memory pages.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`LogoEngine::detect`].
    pub fn process(&self, pages: Vec<RgbImage>) -> Result<ProcessOutcome> {
        let detection = self.detect(&pages)?;

        if self.options.dry_run {
            tracing::info!("Dry run: pages left untouched");
            return Ok(ProcessOutcome {
                detection,
                pages,
                reports: Vec::new(),
            });
        }

        let (pages, reports): (Vec<_>, Vec<_>) = self
            .clean_pages(&pages, &detection)
            .into_iter()
            .map(|cleaned| (cleaned.image, cleaned.report))
            .unzip();

        Ok(ProcessOutcome {
            detection,
            pages,
            reports,
        })
    }

    /// Pull every page from `source`, process them, and hand the result to
    /// `sink`. Nothing is written in dry-run mode.
    ///
    /// # Errors
    ///
    /// Returns any error from the source, the pipeline, or the sink.
    pub fn process_document<S>(&self, source: &S, sink: &mut dyn PageSink) -> Result<ProcessOutcome>
    where
        S: PageSource + ?Sized,
    {
        let count = source.page_count();
        tracing::info!(pages = count, dpi = self.options.resolution, "Rendering pages");

        let pages = (0..count)
            .map(|i| source.render_page(i, self.options.resolution))
            .collect::<Result<Vec<_>>>()?;
        if let Some(first) = pages.first() {
            tracing::info!(
                width = first.width(),
                height = first.height(),
                "Page raster size"
            );
        }

        let outcome = self.process(pages)?;
        if !self.options.dry_run {
            sink.write_pages(&outcome.pages, self.options.resolution)?;
        }
        Ok(outcome)
    }
}
