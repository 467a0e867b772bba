//! Shared test utilities: synthetic source images written on the fly.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_rgb_png(&tmp.path().join("wide.png"), 400, 200, [200, 30, 30]);
//! let img = open_image(&tmp.path().join("wide.png"));
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use std::path::Path;

/// Solid-colour RGB PNG.
pub fn write_rgb_png(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(color))
        .save(path)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}

/// Solid single-channel PNG.
pub fn write_gray_png(path: &Path, width: u32, height: u32, value: u8) {
    GrayImage::from_pixel(width, height, Luma([value]))
        .save(path)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}

/// RGB JPEG with a horizontal/vertical gradient, so resampling has
/// something to average.
pub fn write_gradient_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    });
    img.save(path)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}

/// RGB JPEG whose top half is white and bottom half black, carrying an EXIF
/// Orientation tag. The pixel data is stored as `width × height`; viewers
/// honouring the tag show it rotated.
pub fn write_oriented_jpeg(path: &Path, width: u32, height: u32, orientation: u16) {
    let img = RgbImage::from_fn(width, height, |_, y| {
        if y < height / 2 { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) }
    });
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, 95)
        .encode_image(&img)
        .unwrap();

    // Big-endian TIFF header, one IFD entry: 0x0112 Orientation, SHORT, 1
    let mut app1 = b"Exif\0\0MM\0\x2a\0\0\0\x08\0\x01\x01\x12\0\x03\0\0\0\x01".to_vec();
    app1.extend_from_slice(&orientation.to_be_bytes());
    app1.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    let len = u16::try_from(app1.len() + 2).unwrap();

    // Insert right after SOI
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}

/// Decode an image, sniffing the format from content. Panics on failure.
pub fn open_image(path: &Path) -> DynamicImage {
    image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .unwrap_or_else(|e| panic!("failed to open {}: {e}", path.display()))
        .decode()
        .unwrap_or_else(|e| panic!("failed to decode {}: {e}", path.display()))
}
