//! PDF documents as page sources and sinks.
//!
//! [`PdfSource`] rasterizes pages through PDFium at the requested DPI.
//! [`PdfWriter`] rebuilds one PDF with each cleaned raster as a full-page
//! image, sized so the page keeps its physical dimensions at that DPI.
//!
//! PDFium is loaded at runtime. Discovery order:
//! 1. `PDFIUM_DYNAMIC_LIB_PATH` (explicit path to the library file)
//! 2. the current directory
//! 3. system library search paths

use std::path::{Path, PathBuf};

use image::RgbImage;
use pdfium_render::prelude::{PdfRenderConfig, Pdfium};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};

use crate::error::{Error, Result};
use crate::pages::{resolve, PageSink, PageSource};

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Millimetres per inch.
const MM_PER_INCH: f32 = 25.4;

/// Environment variable naming the PDFium library file.
pub const PDFIUM_LIBRARY_ENV: &str = "PDFIUM_DYNAMIC_LIB_PATH";

fn load_pdfium() -> Result<Pdfium> {
    if let Ok(path) = std::env::var(PDFIUM_LIBRARY_ENV) {
        tracing::debug!(path = %path, "Loading PDFium from {PDFIUM_LIBRARY_ENV}");
        let bindings = Pdfium::bind_to_library(&path)
            .map_err(|e| Error::Pdf(format!("cannot load PDFium from {path}: {e}")))?;
        return Ok(Pdfium::new(bindings));
    }

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| {
            Error::Pdf(format!(
                "PDFium library not found; set {PDFIUM_LIBRARY_ENV} or install PDFium: {e}"
            ))
        })?;
    Ok(Pdfium::new(bindings))
}

/// Pixel size of a page measured in points, rendered at `dpi`.
///
/// Both sides are at least one pixel.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn render_size(width_points: f32, height_points: f32, dpi: u32) -> (u32, u32) {
    let scale = dpi as f32 / POINTS_PER_INCH;
    let w = (width_points * scale).round().max(1.0);
    let h = (height_points * scale).round().max(1.0);
    (w as u32, h as u32)
}

/// Physical page size of a `width` x `height` raster printed at `dpi`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn page_size(width: u32, height: u32, dpi: u32) -> (Mm, Mm) {
    let dpi = dpi as f32;
    (
        Mm(width as f32 / dpi * MM_PER_INCH),
        Mm(height as f32 / dpi * MM_PER_INCH),
    )
}

/// A PDF document rasterized page by page.
pub struct PdfSource {
    pdfium: Pdfium,
    path: PathBuf,
    page_count: usize,
}

impl PdfSource {
    /// Bind PDFium and open the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pdf`] if PDFium cannot be loaded and
    /// [`Error::InputUnavailable`] if the file is missing, unreadable,
    /// encrypted, or has no pages.
    pub fn open(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| Error::InputUnavailable {
            path: path.to_path_buf(),
            reason,
        };
        if !path.is_file() {
            return Err(unavailable("no such file".to_string()));
        }

        let pdfium = load_pdfium()?;
        let page_count = {
            let document = pdfium
                .load_pdf_from_file(path, None)
                .map_err(|e| unavailable(e.to_string()))?;
            usize::from(document.pages().len())
        };
        if page_count == 0 {
            return Err(unavailable("document has no pages".to_string()));
        }
        tracing::debug!(path = %path.display(), pages = page_count, "Opened PDF");

        Ok(Self {
            pdfium,
            path: path.to_path_buf(),
            page_count,
        })
    }

    /// Path of the source document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output file for the cleaned document.
    ///
    /// An existing directory receives a file with the input's name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputOverwritesInput`] if the target resolves to the
    /// source document.
    pub fn output_target(&self, output: &Path) -> Result<PathBuf> {
        let target = match self.path.file_name() {
            Some(name) if output.is_dir() => output.join(name),
            _ => output.to_path_buf(),
        };
        if resolve(&target) == resolve(&self.path) {
            return Err(Error::OutputOverwritesInput(target));
        }
        Ok(target)
    }
}

impl PageSource for PdfSource {
    fn page_count(&self) -> usize {
        self.page_count
    }

    #[allow(clippy::cast_possible_wrap)]
    fn render_page(&self, index: usize, dpi: u32) -> Result<RgbImage> {
        let document = self
            .pdfium
            .load_pdf_from_file(&self.path, None)
            .map_err(|e| Error::Pdf(format!("failed to reload {}: {e}", self.path.display())))?;
        let page_index = u16::try_from(index)
            .ok()
            .filter(|_| index < self.page_count)
            .ok_or(Error::PageCountMismatch {
                expected: index + 1,
                actual: self.page_count,
            })?;
        let page = document
            .pages()
            .get(page_index)
            .map_err(|e| Error::Pdf(format!("page {}: {e}", index + 1)))?;

        let (width, height) = render_size(page.width().value, page.height().value, dpi);
        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| Error::Pdf(format!("page {} failed to render: {e}", index + 1)))?;

        let image = bitmap.as_image().to_rgb8();
        tracing::debug!(page = index + 1, width, height, dpi, "Rendered PDF page");
        Ok(image)
    }
}

/// Writes every page into one PDF, one full-page image per page.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    target: PathBuf,
}

impl PdfWriter {
    /// Create a writer for the PDF at `target`.
    #[must_use]
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }

    fn title(&self) -> String {
        self.target
            .file_stem()
            .map_or_else(|| "document".to_string(), |s| s.to_string_lossy().into_owned())
    }
}

impl PageSink for PdfWriter {
    #[allow(clippy::cast_precision_loss)]
    fn write_pages(&mut self, pages: &[RgbImage], dpi: u32) -> Result<()> {
        if pages.is_empty() {
            return Err(Error::EmptyDocument);
        }
        if dpi == 0 {
            return Err(Error::InvalidResolution(dpi));
        }

        let mut doc = PdfDocument::new(&self.title());
        let mut pdf_pages = Vec::with_capacity(pages.len());
        for page in pages {
            let (width, height) = page.dimensions();
            let raw = RawImage {
                pixels: RawImageData::U8(page.as_raw().clone()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let id = doc.add_image(&raw);

            let ops = vec![Op::UseXobject {
                id,
                transform: XObjectTransform {
                    translate_x: None,
                    translate_y: None,
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(dpi as f32),
                    rotate: None,
                },
            }];
            let (page_w, page_h) = page_size(width, height, dpi);
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }
        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            tracing::debug!(count = warnings.len(), "PDF writer reported warnings");
        }

        if let Some(parent) = self.target.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.target, bytes)?;
        tracing::debug!(path = %self.target.display(), pages = pages.len(), "Wrote PDF");
        Ok(())
    }
}
