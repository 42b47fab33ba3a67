//! Local background colour estimation around the logo bounds.
//!
//! Samples are taken a few pixels outside the bounds on the sides facing the
//! page interior (plus a short reach towards the page edge), filtered to bright
//! pixels only, and reduced to a per-channel median.

use image::{Rgb, RgbImage};

use crate::classify::is_bright;
use crate::geometry::{Corner, Rect};

/// Outward offsets used on the side facing the page interior.
const FAR_OFFSETS: [u32; 3] = [3, 5, 8];
/// Outward offsets used on the side facing the page edge.
const NEAR_OFFSETS: [u32; 2] = [3, 5];
/// Sample positions along the horizontal edges.
const HORIZONTAL_STEPS: u32 = 5;
/// Sample positions along the vertical edges.
const VERTICAL_STEPS: u32 = 3;

/// Estimated background colour for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundSample {
    /// Median of the bright samples, or the fallback pixel.
    pub color: Rgb<u8>,
    /// Number of bright samples the median was taken over.
    pub samples: usize,
}

impl BackgroundSample {
    /// Whether the bounds' top-left pixel was used because nothing bright was found.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.samples == 0
    }
}

/// `steps` evenly spaced integer positions from `start` to `end` inclusive.
#[allow(clippy::cast_possible_truncation)]
fn linspace(start: u32, end: u32, steps: u32) -> impl Iterator<Item = u32> {
    let span = u64::from(end.saturating_sub(start));
    let last = u64::from(steps.saturating_sub(1)).max(1);
    (0..u64::from(steps)).map(move |i| start + (span * i / last) as u32)
}

/// Candidate sample coordinates around `bounds` for a logo at `corner`.
fn sample_points(bounds: Rect, corner: Corner) -> Vec<(i64, i64)> {
    let left = i64::from(bounds.x);
    let top = i64::from(bounds.y);
    let right = i64::from(bounds.right()) - 1;
    let bottom = i64::from(bounds.bottom()) - 1;
    let mut points = Vec::new();

    let columns = || linspace(bounds.x, bounds.right().saturating_sub(1), HORIZONTAL_STEPS);
    if corner.is_bottom() {
        for x in columns() {
            points.extend(FAR_OFFSETS.iter().map(|&d| (i64::from(x), top - i64::from(d))));
        }
        for x in columns() {
            points.extend(NEAR_OFFSETS.iter().map(|&d| (i64::from(x), bottom + i64::from(d))));
        }
    } else {
        for x in columns() {
            points.extend(FAR_OFFSETS.iter().map(|&d| (i64::from(x), bottom + i64::from(d))));
        }
    }

    for y in linspace(bounds.y, bounds.bottom().saturating_sub(1), VERTICAL_STEPS) {
        for &d in &NEAR_OFFSETS {
            let x = if corner.is_right() {
                right + i64::from(d)
            } else {
                left - i64::from(d)
            };
            points.push((x, i64::from(y)));
        }
    }
    points
}

/// Median of one channel; even counts average the two middle values.
fn median(values: &mut [u8]) -> f64 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (f64::from(values[mid - 1]) + f64::from(values[mid])) / 2.0
    } else {
        f64::from(values[mid])
    }
}

/// Estimate the background colour just outside `bounds` on one page.
///
/// Only pixels with every channel above 150 are kept, so neither the logo nor
/// an overlapping toolbar contaminates the estimate. With no usable sample the
/// pixel at the bounds' top-left corner is returned and `samples` is zero.
#[must_use]
pub fn sample_background(page: &RgbImage, bounds: Rect, corner: Corner) -> BackgroundSample {
    let (w, h) = (i64::from(page.width()), i64::from(page.height()));
    let kept: Vec<Rgb<u8>> = sample_points(bounds, corner)
        .into_iter()
        .filter(|&(x, y)| (0..w).contains(&x) && (0..h).contains(&y))
        .filter_map(|(x, y)| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let px = *page.get_pixel(x as u32, y as u32);
            is_bright(&px).then_some(px)
        })
        .collect();

    if kept.is_empty() {
        return BackgroundSample {
            color: *page.get_pixel(bounds.x, bounds.y),
            samples: 0,
        };
    }

    let mut color = [0u8; 3];
    for (ch, out) in color.iter_mut().enumerate() {
        let mut channel: Vec<u8> = kept.iter().map(|px| px[ch]).collect();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            *out = median(&mut channel).round().clamp(0.0, 255.0) as u8;
        }
    }

    BackgroundSample {
        color: Rgb(color),
        samples: kept.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(page: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                page.put_pixel(x, y, color);
            }
        }
    }

    #[test]
    fn linspace_includes_both_ends() {
        let v: Vec<u32> = linspace(10, 20, 5).collect();
        assert_eq!(v, vec![10, 12, 15, 17, 20]);
        let single: Vec<u32> = linspace(4, 4, 3).collect();
        assert_eq!(single, vec![4, 4, 4]);
    }

    #[test]
    fn median_of_even_count_averages_middle() {
        assert!((median(&mut [1, 9, 3, 7]) - 5.0).abs() < f64::EPSILON);
        assert!((median(&mut [200, 100, 150]) - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn uniform_background_is_recovered() {
        let mut page = RgbImage::from_pixel(200, 100, Rgb([240, 235, 230]));
        let bounds = Rect::new(120, 70, 60, 20);
        fill(&mut page, bounds, Rgb([0, 0, 0]));
        let sample = sample_background(&page, bounds, Corner::BottomRight);
        assert_eq!(sample.color, Rgb([240, 235, 230]));
        assert!(!sample.is_fallback());
    }

    #[test]
    fn dark_and_ui_pixels_are_excluded() {
        let mut page = RgbImage::from_pixel(200, 100, Rgb([220, 220, 220]));
        let bounds = Rect::new(20, 40, 60, 20);
        // toolbar directly above the bounds, logo inside
        fill(&mut page, Rect::new(0, 30, 200, 10), Rgb([10, 10, 90]));
        fill(&mut page, bounds, Rgb([0, 0, 0]));
        let sample = sample_background(&page, bounds, Corner::BottomLeft);
        assert_eq!(sample.color, Rgb([220, 220, 220]));
        for ch in sample.color.0 {
            assert!(ch >= 150);
        }
    }

    #[test]
    fn median_resists_outliers() {
        let mut page = RgbImage::from_pixel(200, 100, Rgb([200, 200, 200]));
        let bounds = Rect::new(20, 10, 60, 20);
        // a bright but off-colour stripe catches a minority of samples
        fill(&mut page, Rect::new(0, 37, 200, 1), Rgb([255, 180, 180]));
        let sample = sample_background(&page, bounds, Corner::TopLeft);
        assert_eq!(sample.color, Rgb([200, 200, 200]));
    }

    #[test]
    fn no_bright_samples_falls_back_to_bounds_corner() {
        let mut page = RgbImage::from_pixel(200, 100, Rgb([40, 40, 40]));
        let bounds = Rect::new(120, 70, 60, 20);
        page.put_pixel(120, 70, Rgb([1, 2, 3]));
        let sample = sample_background(&page, bounds, Corner::BottomRight);
        assert!(sample.is_fallback());
        assert_eq!(sample.color, Rgb([1, 2, 3]));
    }

    #[test]
    fn bottom_corner_samples_above_and_below() {
        let points = sample_points(Rect::new(100, 50, 10, 10), Corner::BottomRight);
        assert!(points.contains(&(100, 47)));
        assert!(points.contains(&(100, 42)));
        assert!(points.contains(&(109, 62)));
        assert!(points.contains(&(112, 50)));
        assert!(!points.iter().any(|&(x, _)| x < 100));
    }

    #[test]
    fn top_left_corner_samples_below_and_left() {
        let points = sample_points(Rect::new(10, 0, 10, 10), Corner::TopLeft);
        assert!(points.contains(&(10, 12)));
        assert!(points.contains(&(10, 17)));
        assert!(points.contains(&(7, 0)));
        assert!(points.contains(&(5, 9)));
        assert!(!points.iter().any(|&(_, y)| y < 0));
    }
}
