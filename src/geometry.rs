//! Page geometry: anchor corners, scan window sizes, and pixel rectangles.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A page corner a logo can be anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Bottom-right corner.
    BottomRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Top-right corner.
    TopRight,
    /// Top-left corner.
    TopLeft,
}

impl Corner {
    /// All corners in tie-breaking priority order.
    pub const ALL: [Corner; 4] = [
        Corner::BottomRight,
        Corner::BottomLeft,
        Corner::TopRight,
        Corner::TopLeft,
    ];

    /// Whether the corner sits on the bottom edge of the page.
    #[must_use]
    pub fn is_bottom(self) -> bool {
        matches!(self, Corner::BottomRight | Corner::BottomLeft)
    }

    /// Whether the corner sits on the right edge of the page.
    #[must_use]
    pub fn is_right(self) -> bool {
        matches!(self, Corner::BottomRight | Corner::TopRight)
    }

    /// Canonical name, as accepted by [`Corner::from_str`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Corner::BottomRight => "bottom-right",
            Corner::BottomLeft => "bottom-left",
            Corner::TopRight => "top-right",
            Corner::TopLeft => "top-left",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Corner {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Corner::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidCorner(s.to_string()))
    }
}

/// Width and height of the window scanned for the logo at a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSize {
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
}

impl ScanSize {
    /// Create a scan size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ScanSize {
    fn default() -> Self {
        Self::new(300, 60)
    }
}

impl fmt::Display for ScanSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ScanSize {
    type Err = Error;

    /// Parse `WxH`, e.g. `300x60`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidScanSize(s.to_string());
        let (w, h) = s
            .trim()
            .split_once(|c: char| c.eq_ignore_ascii_case(&'x'))
            .ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self::new(width, height))
    }
}

/// An axis-aligned pixel rectangle; `x + width` and `y + height` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from inclusive-exclusive corner coordinates.
    #[must_use]
    pub fn from_corners(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self::new(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1))
    }

    /// One past the rightmost column.
    #[must_use]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom row.
    #[must_use]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Number of pixels covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether the rectangle covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the pixel `(x, y)` lies inside.
    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.x,
            self.y,
            self.right(),
            self.bottom()
        )
    }
}

/// The scan window anchored at `corner` of a `page_width` x `page_height` page.
///
/// The window is clipped to the page when the page is smaller than `size`.
#[must_use]
pub fn scan_window(page_width: u32, page_height: u32, corner: Corner, size: ScanSize) -> Rect {
    let w = size.width.min(page_width);
    let h = size.height.min(page_height);
    let x = if corner.is_right() { page_width - w } else { 0 };
    let y = if corner.is_bottom() { page_height - h } else { 0 };
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_parses_canonical_names() {
        for corner in Corner::ALL {
            assert_eq!(corner.name().parse::<Corner>().unwrap(), corner);
        }
        assert_eq!("Top-Left".parse::<Corner>().unwrap(), Corner::TopLeft);
        assert!("middle".parse::<Corner>().is_err());
        assert!("auto".parse::<Corner>().is_err());
    }

    #[test]
    fn scan_size_parses_wxh() {
        assert_eq!("300x60".parse::<ScanSize>().unwrap(), ScanSize::new(300, 60));
        assert_eq!("120X40".parse::<ScanSize>().unwrap(), ScanSize::new(120, 40));
        assert!("300".parse::<ScanSize>().is_err());
        assert!("0x60".parse::<ScanSize>().is_err());
        assert!("axb".parse::<ScanSize>().is_err());
        assert_eq!(ScanSize::default().to_string(), "300x60");
    }

    #[test]
    fn scan_window_anchors_to_each_corner() {
        let size = ScanSize::new(300, 60);
        assert_eq!(
            scan_window(1000, 1200, Corner::BottomRight, size),
            Rect::new(700, 1140, 300, 60)
        );
        assert_eq!(
            scan_window(1000, 1200, Corner::BottomLeft, size),
            Rect::new(0, 1140, 300, 60)
        );
        assert_eq!(
            scan_window(1000, 1200, Corner::TopRight, size),
            Rect::new(700, 0, 300, 60)
        );
        assert_eq!(
            scan_window(1000, 1200, Corner::TopLeft, size),
            Rect::new(0, 0, 300, 60)
        );
    }

    #[test]
    fn scan_window_is_clipped_to_small_pages() {
        let window = scan_window(200, 40, Corner::BottomRight, ScanSize::new(300, 60));
        assert_eq!(window, Rect::new(0, 0, 200, 40));
        assert!(Rect::new(0, 0, 200, 40).contains_rect(&window));
    }

    #[test]
    fn rect_edges_and_containment() {
        let r = Rect::from_corners(10, 20, 30, 25);
        assert_eq!((r.width, r.height), (20, 5));
        assert_eq!(r.area(), 100);
        assert!(r.contains(10, 20));
        assert!(!r.contains(30, 20));
        assert!(!r.contains(10, 25));
        assert!(Rect::new(0, 0, 0, 5).is_empty());
    }
}
