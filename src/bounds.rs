//! Logo bounding box from the union of dark pixels across all pages.

use image::RgbImage;

use crate::classify::is_dark;
use crate::error::{Error, Result, Warning};
use crate::geometry::{scan_window, Corner, Rect, ScanSize};

/// Pixels added around the tight union box on every side.
pub const BOUNDS_MARGIN: u32 = 5;

/// Bounding box shared by every page of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoBounds {
    /// The scan window the bounds were searched in.
    pub window: Rect,
    /// The region to erase on every page; always inside `window`.
    pub rect: Rect,
    /// Set when no page had a dark pixel in the window.
    pub warning: Option<Warning>,
}

/// Boolean union of per-page dark masks over one window.
struct UnionMask {
    width: u32,
    cells: Vec<bool>,
}

impl UnionMask {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            cells: vec![false; width as usize * height as usize],
        }
    }

    fn merge_page(&mut self, page: &RgbImage, window: Rect) {
        for dy in 0..window.height {
            for dx in 0..window.width {
                if is_dark(page.get_pixel(window.x + dx, window.y + dy)) {
                    self.cells[(dy * self.width + dx) as usize] = true;
                }
            }
        }
    }

    /// Inclusive `(min_x, min_y, max_x, max_y)` of set cells, window-relative.
    #[allow(clippy::cast_possible_truncation)]
    fn extent(&self) -> Option<(u32, u32, u32, u32)> {
        let mut extent: Option<(u32, u32, u32, u32)> = None;
        for (i, &set) in self.cells.iter().enumerate() {
            if !set {
                continue;
            }
            let x = (i % self.width as usize) as u32;
            let y = (i / self.width as usize) as u32;
            extent = Some(match extent {
                None => (x, y, x, y),
                Some((x1, y1, x2, y2)) => (x1.min(x), y1.min(y), x2.max(x), y2.max(y)),
            });
        }
        extent
    }
}

/// Reject empty documents, zero-sized rasters, and mixed page sizes.
///
/// Returns the shared `(width, height)`.
pub(crate) fn check_pages(pages: &[RgbImage]) -> Result<(u32, u32)> {
    let first = pages.first().ok_or(Error::EmptyDocument)?;
    let expected = first.dimensions();
    for (page, img) in pages.iter().enumerate() {
        let actual = img.dimensions();
        if actual != expected {
            return Err(Error::PageSizeMismatch {
                page,
                expected,
                actual,
            });
        }
        if actual.0 == 0 || actual.1 == 0 {
            return Err(Error::EmptyPage(page));
        }
    }
    Ok(expected)
}

/// Derive the logo bounds at `corner` from every page.
///
/// The window is taken from the shared page dimensions. With no dark pixel
/// anywhere, the whole window is returned together with
/// [`Warning::NoArtifactDetected`].
///
/// # Errors
///
/// Returns [`Error::EmptyDocument`] for no pages, [`Error::EmptyPage`] for
/// zero-sized rasters, and [`Error::PageSizeMismatch`] when a page differs in
/// size from the first.
pub fn find_logo_bounds(
    pages: &[RgbImage],
    corner: Corner,
    size: ScanSize,
) -> Result<LogoBounds> {
    let (page_w, page_h) = check_pages(pages)?;
    let window = scan_window(page_w, page_h, corner, size);

    let mut mask = UnionMask::new(window.width, window.height);
    for page in pages {
        mask.merge_page(page, window);
    }

    let Some((min_x, min_y, max_x, max_y)) = mask.extent() else {
        tracing::warn!(window = %window, "No logo pixels detected, falling back to the scan window");
        return Ok(LogoBounds {
            window,
            rect: window,
            warning: Some(Warning::NoArtifactDetected),
        });
    };

    let x1 = (window.x + min_x).saturating_sub(BOUNDS_MARGIN).max(window.x);
    let y1 = (window.y + min_y).saturating_sub(BOUNDS_MARGIN).max(window.y);
    let x2 = (window.x + max_x + 1 + BOUNDS_MARGIN).min(window.right());
    let y2 = (window.y + max_y + 1 + BOUNDS_MARGIN).min(window.bottom());
    let rect = Rect::from_corners(x1, y1, x2, y2);

    tracing::info!(
        bounds = %rect,
        width = rect.width,
        height = rect.height,
        "Detected logo bounds"
    );

    Ok(LogoBounds {
        window,
        rect,
        warning: None,
    })
}
