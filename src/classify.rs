//! Per-pixel classifiers.
//!
//! Each predicate looks at a single RGB pixel and nothing else, so they can be
//! tested directly against literal colour triples.

use image::Rgb;

/// Channel values below this count as dark.
pub const DARK_THRESHOLD: u8 = 180;

/// Channel values above this count as bright background.
pub const BRIGHT_THRESHOLD: u8 = 150;

/// Minimum blue-over-red excess for an interface pixel.
pub const UI_BLUE_SHIFT: i16 = 20;

/// Logo evidence: every channel below [`DARK_THRESHOLD`].
#[must_use]
pub fn is_dark(px: &Rgb<u8>) -> bool {
    px.0.iter().all(|&c| c < DARK_THRESHOLD)
}

/// Usable background sample: every channel above [`BRIGHT_THRESHOLD`].
#[must_use]
pub fn is_bright(px: &Rgb<u8>) -> bool {
    px.0.iter().all(|&c| c > BRIGHT_THRESHOLD)
}

/// Dark, blue-shifted pixel belonging to a toolbar or badge rather than the logo.
///
/// Plain black or grey logo ink fails the blue-shift test.
#[must_use]
pub fn is_ui_element(px: &Rgb<u8>) -> bool {
    let [r, g, b] = px.0;
    r < 80 && g < 80 && b < 120 && i16::from(b) - i16::from(r) > UI_BLUE_SHIFT
}
