//! Detection of interface elements (toolbars, badges) overlapping the logo bounds.

use image::RgbImage;

use crate::classify::is_ui_element;
use crate::geometry::Rect;

/// Sampling stride in both axes.
const STRIDE: usize = 2;

/// Interface pixels found when scanning `bounds` at a stride of 2 in both axes.
#[must_use]
pub fn ui_pixel_count(page: &RgbImage, bounds: Rect) -> u64 {
    let mut count = 0;
    for y in (bounds.y..bounds.bottom()).step_by(STRIDE) {
        for x in (bounds.x..bounds.right()).step_by(STRIDE) {
            if is_ui_element(page.get_pixel(x, y)) {
                count += 1;
            }
        }
    }
    count
}

/// Whether an interface element overlaps `bounds` on this page.
///
/// The strided count is compared against 1% of the full, unstrided area of
/// `bounds`, so the effective density needed is roughly four times higher
/// than 1%.
///
/// The comparison is inclusive: a count that lands exactly on the threshold
/// counts as overlap, rather than requiring the count to exceed it. A 20x20
/// interface block inside a 100x100 box gives 100 strided hits against a
/// threshold of 100 and is treated as overlapping.
#[must_use]
pub fn has_overlapping_ui(page: &RgbImage, bounds: Rect) -> bool {
    if bounds.is_empty() {
        return false;
    }
    ui_pixel_count(page, bounds) * 100 >= bounds.area()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn fill(page: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                page.put_pixel(x, y, color);
            }
        }
    }

    #[test]
    fn white_region_has_no_overlap() {
        let page = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        assert!(!has_overlapping_ui(&page, Rect::new(0, 0, 100, 100)));
    }

    #[test]
    fn blue_block_of_four_percent_is_overlap() {
        let mut page = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        fill(&mut page, Rect::new(40, 40, 20, 20), Rgb([10, 10, 90]));
        assert_eq!(ui_pixel_count(&page, Rect::new(0, 0, 100, 100)), 100);
        assert!(has_overlapping_ui(&page, Rect::new(0, 0, 100, 100)));
    }

    #[test]
    fn one_hit_short_of_threshold_is_not_overlap() {
        let mut page = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        fill(&mut page, Rect::new(40, 40, 20, 20), Rgb([10, 10, 90]));
        page.put_pixel(40, 40, Rgb([255, 255, 255]));
        assert_eq!(ui_pixel_count(&page, Rect::new(0, 0, 100, 100)), 99);
        assert!(!has_overlapping_ui(&page, Rect::new(0, 0, 100, 100)));
    }

    #[test]
    fn sparse_blue_pixels_fall_below_threshold() {
        let mut page = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        // 3% of the area, but the stride only sees a quarter of it
        fill(&mut page, Rect::new(0, 0, 30, 10), Rgb([10, 10, 90]));
        assert!(!has_overlapping_ui(&page, Rect::new(0, 0, 100, 100)));
    }

    #[test]
    fn black_logo_is_not_interface() {
        let page = RgbImage::new(100, 100);
        assert_eq!(ui_pixel_count(&page, Rect::new(0, 0, 100, 100)), 0);
        assert!(!has_overlapping_ui(&page, Rect::new(0, 0, 100, 100)));
    }

    #[test]
    fn empty_bounds_never_overlap() {
        let page = RgbImage::from_pixel(10, 10, Rgb([10, 10, 90]));
        assert!(!has_overlapping_ui(&page, Rect::new(5, 5, 0, 3)));
    }
}
