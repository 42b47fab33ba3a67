//! Corner location by aggregate dark-pixel evidence.

use std::fmt;

use image::RgbImage;

use crate::classify::is_dark;
use crate::geometry::{scan_window, Corner, Rect, ScanSize};

/// Aggregate dark-pixel counts per corner, over every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerScores([(Corner, u64); 4]);

impl CornerScores {
    /// Dark-pixel count recorded for `corner`.
    #[must_use]
    pub fn score(&self, corner: Corner) -> u64 {
        self.0
            .iter()
            .find(|(c, _)| *c == corner)
            .map_or(0, |&(_, s)| s)
    }

    /// The highest-scoring corner; ties go to the earlier corner in
    /// [`Corner::ALL`].
    #[must_use]
    pub fn best(&self) -> Corner {
        let mut best = self.0[0];
        for &entry in &self.0[1..] {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        best.0
    }

    /// Iterate over `(corner, score)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Corner, u64)> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for CornerScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (corner, score)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{corner}={score}")?;
        }
        Ok(())
    }
}

/// Number of dark pixels inside `window` on one page.
fn count_dark(page: &RgbImage, window: Rect) -> u64 {
    let mut count = 0;
    for y in window.y..window.bottom() {
        for x in window.x..window.right() {
            if is_dark(page.get_pixel(x, y)) {
                count += 1;
            }
        }
    }
    count
}

/// Score all four corner windows across `pages`.
///
/// Each page's windows are derived from that page's own dimensions.
#[must_use]
pub fn corner_scores(pages: &[RgbImage], size: ScanSize) -> CornerScores {
    CornerScores(Corner::ALL.map(|corner| {
        let total: u64 = pages
            .iter()
            .map(|page| {
                let window = scan_window(page.width(), page.height(), corner, size);
                count_dark(page, window)
            })
            .sum();
        (corner, total)
    }))
}

/// Pick the corner whose window holds the most dark pixels across `pages`.
#[must_use]
pub fn locate_corner(pages: &[RgbImage], size: ScanSize) -> (Corner, CornerScores) {
    let scores = corner_scores(pages, size);
    let best = scores.best();
    tracing::info!(scores = %scores, corner = %best, "Estimated logo corner");
    (best, scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn white_page(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([255, 255, 255]))
    }

    fn paint(page: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                page.put_pixel(x, y, color);
            }
        }
    }

    #[test]
    fn blank_pages_tie_to_bottom_right() {
        let pages = vec![white_page(400, 200), white_page(400, 200)];
        let (corner, scores) = locate_corner(&pages, ScanSize::new(100, 20));
        assert_eq!(corner, Corner::BottomRight);
        assert!(scores.iter().all(|(_, s)| s == 0));
    }

    #[test]
    fn equal_nonzero_scores_tie_to_bottom_right() {
        // A fully black page scores the same in every corner.
        let pages = vec![RgbImage::new(400, 200)];
        let (corner, scores) = locate_corner(&pages, ScanSize::new(100, 20));
        assert_eq!(corner, Corner::BottomRight);
        assert_eq!(scores.score(Corner::TopLeft), 2000);
    }

    #[test]
    fn tie_between_lower_priority_corners_keeps_priority_order() {
        let mut page = white_page(400, 200);
        paint(&mut page, Rect::new(0, 0, 10, 10), Rgb([0, 0, 0]));
        paint(&mut page, Rect::new(390, 0, 10, 10), Rgb([0, 0, 0]));
        let (corner, _) = locate_corner(&[page], ScanSize::new(100, 20));
        assert_eq!(corner, Corner::TopRight);
    }

    #[test]
    fn scores_aggregate_over_pages() {
        let mut a = white_page(400, 200);
        let mut b = white_page(400, 200);
        paint(&mut a, Rect::new(0, 190, 10, 10), Rgb([0, 0, 0]));
        paint(&mut b, Rect::new(0, 190, 10, 10), Rgb([0, 0, 0]));
        // a single larger blob on one page in another corner
        paint(&mut a, Rect::new(0, 0, 15, 10), Rgb([20, 20, 20]));

        let (corner, scores) = locate_corner(&[a, b], ScanSize::new(100, 20));
        assert_eq!(scores.score(Corner::BottomLeft), 200);
        assert_eq!(scores.score(Corner::TopLeft), 150);
        assert_eq!(corner, Corner::BottomLeft);
    }

    #[test]
    fn scores_display_lists_every_corner() {
        let scores = corner_scores(&[white_page(50, 50)], ScanSize::new(10, 10));
        let text = scores.to_string();
        for corner in Corner::ALL {
            assert!(text.contains(corner.name()));
        }
    }
}
