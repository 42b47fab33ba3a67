//! Overwrite protection across differently spelled paths.
//!
//! This binary changes the working directory, so it holds a single test.

use std::path::Path;

use image::RgbImage;
use page_logo_removal::{Error, ImageSequence};

#[test]
fn relative_and_absolute_spellings_of_the_input_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let scans = dir.path().join("scans");
    std::fs::create_dir(&scans).unwrap();
    RgbImage::new(10, 10).save(scans.join("p1.png")).unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    // relative input, absolute output
    let source = ImageSequence::open(Path::new("scans")).unwrap();
    assert!(matches!(
        source.output_targets(&scans),
        Err(Error::OutputOverwritesInput(_))
    ));

    // absolute input, relative output
    let source = ImageSequence::open(&scans).unwrap();
    assert!(matches!(
        source.output_targets(Path::new("scans")),
        Err(Error::OutputOverwritesInput(_))
    ));
    assert!(matches!(
        source.output_targets(Path::new("./other/../scans")),
        Err(Error::OutputOverwritesInput(_))
    ));

    // single relative file with a detour through a missing directory
    let source = ImageSequence::open(Path::new("scans/p1.png")).unwrap();
    assert!(matches!(
        source.output_targets(Path::new("scans/sub/../p1.png")),
        Err(Error::OutputOverwritesInput(_))
    ));

    assert!(source.output_targets(Path::new("scans_clean.png")).is_ok());
}
