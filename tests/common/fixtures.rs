//! Album fixtures for integration tests.

use std::fs;

use epaper_pipeline::PixelBuffer;
use photoframe::codec;
use tempfile::TempDir;

/// Encode a solid-color PNG of the given size.
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let buf = PixelBuffer::filled(width, height, rgb);
    codec::encode_png(&buf).expect("PNG encoding of a test image")
}

/// Encode a solid-color JPEG of the given size.
pub fn solid_jpeg(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let buf = PixelBuffer::filled(width, height, rgb);
    codec::encode_jpeg(&buf, 90).expect("JPEG encoding of a test image")
}

/// Build a temporary album tree:
///
/// ```text
/// albums/
///   vacation/ wide.png (1600x1200), tall.png (600x800)
///   family/   dinner.jpg (800x480)
/// ```
pub fn album_fixture() -> TempDir {
    let dir = TempDir::new().expect("temp album dir");

    let vacation = dir.path().join("vacation");
    let family = dir.path().join("family");
    fs::create_dir_all(&vacation).unwrap();
    fs::create_dir_all(&family).unwrap();

    fs::write(vacation.join("wide.png"), solid_png(1600, 1200, [120, 160, 90])).unwrap();
    fs::write(vacation.join("tall.png"), solid_png(600, 800, [60, 80, 200])).unwrap();
    fs::write(family.join("dinner.jpg"), solid_jpeg(800, 480, [190, 140, 90])).unwrap();

    dir
}

/// An album tree with no images at all.
pub fn empty_fixture() -> TempDir {
    TempDir::new().expect("temp album dir")
}
