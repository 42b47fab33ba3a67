//! Page raster sources and sinks.
//!
//! The pipeline itself only sees `RgbImage` pages. [`PageSource`] and
//! [`PageSink`] are the seams to whatever renders a document into rasters and
//! reassembles them afterwards; this module ships implementations backed by
//! in-memory pages and by image files on disk.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::error::{Error, Result};

/// Supplies the ordered page rasters of one document.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Render page `index` (zero-based) as RGB at `dpi`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be produced.
    fn render_page(&self, index: usize, dpi: u32) -> Result<RgbImage>;
}

/// Receives the processed page rasters of one document.
pub trait PageSink {
    /// Write every page, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if any page cannot be written.
    fn write_pages(&mut self, pages: &[RgbImage], dpi: u32) -> Result<()>;
}

impl PageSource for [RgbImage] {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn render_page(&self, index: usize, _dpi: u32) -> Result<RgbImage> {
        self.get(index).cloned().ok_or_else(|| Error::PageCountMismatch {
            expected: index + 1,
            actual: self.len(),
        })
    }
}

/// A document stored as one pre-rendered image file per page.
///
/// Pages are already rasterized, so the requested DPI is not applied.
#[derive(Debug, Clone)]
pub struct ImageSequence {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl ImageSequence {
    /// Open a single image file, or every supported image in a directory
    /// ordered by file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputUnavailable`] if the path does not exist, is not
    /// a supported image, cannot be listed, or holds no supported images.
    pub fn open(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| Error::InputUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        if !path.exists() {
            return Err(unavailable("no such file or directory".to_string()));
        }

        let paths = if path.is_dir() {
            let mut paths: Vec<PathBuf> = std::fs::read_dir(path)
                .map_err(|e| unavailable(e.to_string()))?
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect();
            paths.sort();
            paths
        } else if is_supported_image(path) {
            vec![path.to_path_buf()]
        } else {
            return Err(unavailable("unsupported image format".to_string()));
        };

        if paths.is_empty() {
            return Err(unavailable("no supported page images found".to_string()));
        }

        Ok(Self {
            root: path.to_path_buf(),
            paths,
        })
    }

    /// Page file paths in order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Output path for each page when writing to `output`.
    ///
    /// A single-file input with an image-extension `output` maps to that
    /// file; otherwise pages keep their file names under the `output`
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputOverwritesInput`] if any target resolves to one
    /// of the source files, however the two paths are spelled.
    pub fn output_targets(&self, output: &Path) -> Result<Vec<PathBuf>> {
        let targets: Vec<PathBuf> = if !self.root.is_dir() && is_supported_image(output) {
            vec![output.to_path_buf()]
        } else {
            self.paths
                .iter()
                .filter_map(|p| p.file_name())
                .map(|name| output.join(name))
                .collect()
        };

        let inputs: Vec<PathBuf> = self.paths.iter().map(|p| resolve(p)).collect();
        if let Some(clash) = targets.iter().find(|t| inputs.contains(&resolve(t))) {
            return Err(Error::OutputOverwritesInput(clash.clone()));
        }
        Ok(targets)
    }
}

/// Resolve `path` to an absolute form with symlinks, `.` and `..` removed.
///
/// The longest existing prefix is canonicalized and the components that do
/// not exist yet are replayed on top of it.
pub(crate) fn resolve(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut pending: Vec<&OsStr> = Vec::new();
    let mut base = Some(absolute.as_path());
    while let Some(dir) = base {
        if let Ok(mut resolved) = std::fs::canonicalize(dir) {
            for part in pending.iter().rev() {
                if *part == ".." {
                    resolved.pop();
                } else if *part != "." {
                    resolved.push(part);
                }
            }
            return resolved;
        }
        if let Some(last) = dir.components().next_back() {
            pending.push(last.as_os_str());
        }
        base = dir.parent();
    }
    absolute
}

impl PageSource for ImageSequence {
    fn page_count(&self) -> usize {
        self.paths.len()
    }

    fn render_page(&self, index: usize, _dpi: u32) -> Result<RgbImage> {
        let path = self.paths.get(index).ok_or_else(|| Error::PageCountMismatch {
            expected: index + 1,
            actual: self.paths.len(),
        })?;
        let img = image::open(path).map_err(|e| Error::InputUnavailable {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(img.to_rgb8())
    }
}

/// Writes each page to its own image file.
#[derive(Debug, Clone)]
pub struct ImageWriter {
    targets: Vec<PathBuf>,
}

impl ImageWriter {
    /// Create a writer for the given per-page target paths.
    #[must_use]
    pub fn new(targets: Vec<PathBuf>) -> Self {
        Self { targets }
    }
}

impl PageSink for ImageWriter {
    fn write_pages(&mut self, pages: &[RgbImage], _dpi: u32) -> Result<()> {
        if pages.len() != self.targets.len() {
            return Err(Error::PageCountMismatch {
                expected: self.targets.len(),
                actual: pages.len(),
            });
        }
        for (page, target) in pages.iter().zip(&self.targets) {
            if let Some(parent) = target.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            save_image(page, target)?;
            tracing::debug!(path = %target.display(), "Wrote page");
        }
        Ok(())
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp" | "tif" | "tiff"
        ),
        None => false,
    }
}

/// Check if a file has a `.pdf` extension.
#[must_use]
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Save an RGB image with format-specific quality settings.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(img)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp | ImageFormat::Tiff => {
            img.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// `scan.png` becomes `scan_clean.png`; a directory `pages` becomes
/// `pages_clean`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    match input.extension() {
        Some(ext) if !input.is_dir() => {
            parent.join(format!("{stem}_clean.{}", ext.to_string_lossy()))
        }
        _ => {
            let name = input.file_name().unwrap_or_default().to_string_lossy();
            parent.join(format!("{name}_clean"))
        }
    }
}
