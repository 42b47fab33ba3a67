//! Logo erasure by background fill.
//!
//! Two strategies are available:
//! - **Simple**: paint the whole bounds with the background colour.
//! - **Protective**: per column, paint only the part between the interface
//!   element and the page edge the logo is anchored to.
//!
//! Protective fill scans columns only. A logo anchored left or right is still
//! scanned vertically, chosen by the top/bottom half of its corner, so an
//! interface element that overlaps the logo from the side is not protected.

use std::fmt;

use image::{Rgb, RgbImage};

use crate::classify::is_ui_element;
use crate::geometry::{Corner, Rect};

/// How a page's logo bounds were erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMode {
    /// Whole-rectangle fill.
    Simple,
    /// Column-wise fill that keeps interface pixels.
    Protective,
}

impl fmt::Display for RemovalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Simple => "simple",
            Self::Protective => "ui-protect",
        })
    }
}

/// Paint every pixel of `bounds` with `color`, in place.
pub fn fill_simple(page: &mut RgbImage, bounds: Rect, color: Rgb<u8>) {
    let x2 = bounds.right().min(page.width());
    let y2 = bounds.bottom().min(page.height());
    for y in bounds.y..y2 {
        for x in bounds.x..x2 {
            page.put_pixel(x, y, color);
        }
    }
}

/// Paint `bounds` with `color` column by column, sparing interface pixels.
///
/// For a bottom corner each column is filled from just below its lowest
/// interface pixel down to the bottom of the bounds. For a top corner each
/// column is filled from the top of the bounds down to, but excluding, its
/// topmost interface pixel. Columns without interface pixels are filled
/// entirely.
pub fn fill_protective(page: &mut RgbImage, bounds: Rect, color: Rgb<u8>, corner: Corner) {
    let x2 = bounds.right().min(page.width());
    let y2 = bounds.bottom().min(page.height());

    for x in bounds.x..x2 {
        let rows = if corner.is_bottom() {
            let ui_end = (bounds.y..y2)
                .rev()
                .find(|&y| is_ui_element(page.get_pixel(x, y)))
                .map_or(bounds.y, |y| y + 1);
            ui_end..y2
        } else {
            let ui_start = (bounds.y..y2)
                .find(|&y| is_ui_element(page.get_pixel(x, y)))
                .unwrap_or(y2);
            bounds.y..ui_start
        };

        for y in rows {
            page.put_pixel(x, y, color);
        }
    }
}

/// Erase `bounds` on a copy of `page` using the given strategy.
#[must_use]
pub fn remove_logo(
    page: &RgbImage,
    bounds: Rect,
    color: Rgb<u8>,
    corner: Corner,
    mode: RemovalMode,
) -> RgbImage {
    let mut out = page.clone();
    match mode {
        RemovalMode::Simple => fill_simple(&mut out, bounds, color),
        RemovalMode::Protective => fill_protective(&mut out, bounds, color, corner),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb<u8> = Rgb([250, 248, 240]);
    const UI: Rgb<u8> = Rgb([10, 10, 90]);
    const INK: Rgb<u8> = Rgb([0, 0, 0]);

    #[allow(clippy::cast_possible_truncation)]
    fn textured_page(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 200]))
    }

    #[test]
    fn simple_fill_touches_only_bounds() {
        let page = textured_page(60, 50);
        let bounds = Rect::new(10, 20, 30, 15);
        let out = remove_logo(&page, bounds, BG, Corner::BottomRight, RemovalMode::Simple);
        for (x, y, px) in out.enumerate_pixels() {
            if bounds.contains(x, y) {
                assert_eq!(*px, BG, "({x},{y}) inside bounds");
            } else {
                assert_eq!(px, page.get_pixel(x, y), "({x},{y}) outside bounds");
            }
        }
    }

    #[test]
    fn protective_fill_bottom_keeps_rows_down_to_ui() {
        let mut page = RgbImage::from_pixel(1, 40, INK);
        page.put_pixel(0, 10, UI);
        let original = page.clone();
        let out = remove_logo(
            &page,
            Rect::new(0, 0, 1, 40),
            BG,
            Corner::BottomRight,
            RemovalMode::Protective,
        );
        for y in 0..=10 {
            assert_eq!(out.get_pixel(0, y), original.get_pixel(0, y), "row {y}");
        }
        for y in 11..40 {
            assert_eq!(*out.get_pixel(0, y), BG, "row {y}");
        }
    }

    #[test]
    fn protective_fill_bottom_uses_lowest_ui_pixel() {
        let mut page = RgbImage::from_pixel(1, 40, INK);
        page.put_pixel(0, 5, UI);
        page.put_pixel(0, 20, UI);
        let out = remove_logo(
            &page,
            Rect::new(0, 0, 1, 40),
            BG,
            Corner::BottomLeft,
            RemovalMode::Protective,
        );
        assert_eq!(*out.get_pixel(0, 12), INK);
        assert_eq!(*out.get_pixel(0, 20), UI);
        assert_eq!(*out.get_pixel(0, 21), BG);
    }

    #[test]
    fn protective_fill_top_fills_above_topmost_ui_pixel() {
        let mut page = RgbImage::from_pixel(1, 40, INK);
        page.put_pixel(0, 15, UI);
        page.put_pixel(0, 30, UI);
        let out = remove_logo(
            &page,
            Rect::new(0, 0, 1, 40),
            BG,
            Corner::TopRight,
            RemovalMode::Protective,
        );
        for y in 0..15 {
            assert_eq!(*out.get_pixel(0, y), BG, "row {y}");
        }
        assert_eq!(*out.get_pixel(0, 15), UI);
        assert_eq!(*out.get_pixel(0, 39), INK);
    }

    #[test]
    fn protective_fill_without_ui_fills_whole_column() {
        let page = RgbImage::from_pixel(4, 10, INK);
        let bounds = Rect::new(1, 2, 2, 6);
        let protective = remove_logo(&page, bounds, BG, Corner::TopLeft, RemovalMode::Protective);
        let simple = remove_logo(&page, bounds, BG, Corner::TopLeft, RemovalMode::Simple);
        assert_eq!(protective, simple);
    }

    #[test]
    fn protective_fill_ignores_horizontal_anchor() {
        // A side-by-side toolbar still only shields rows above its lowest pixel.
        let mut page = RgbImage::from_pixel(10, 10, INK);
        for y in 0..10 {
            page.put_pixel(0, y, UI);
        }
        let bounds = Rect::new(0, 0, 10, 10);
        let right = remove_logo(&page, bounds, BG, Corner::BottomRight, RemovalMode::Protective);
        let left = remove_logo(&page, bounds, BG, Corner::BottomLeft, RemovalMode::Protective);
        assert_eq!(right, left);
        assert_eq!(*right.get_pixel(1, 5), BG);
    }

    #[test]
    fn fill_is_clipped_to_page() {
        let mut page = RgbImage::new(10, 10);
        fill_simple(&mut page, Rect::new(8, 8, 5, 5), BG);
        assert_eq!(*page.get_pixel(9, 9), BG);
        assert_eq!(*page.get_pixel(7, 7), Rgb([0, 0, 0]));
    }
}
