//! JPEG fixtures for API tests, built on the core crate's image builders.

use exifdb_core::test_utils::{ascii, field, jpeg_with_exif, rationals, truncate_in_scan, Tag};

pub use exifdb_core::test_utils::plain_jpeg;

/// A JPEG with camera-model and GPS tags in an APP1 segment.
#[allow(dead_code)]
pub fn camera_jpeg() -> Vec<u8> {
    jpeg_with_exif(&[
        field(Tag::Make, ascii("Canon")),
        field(Tag::Model, ascii("EOS R6")),
        field(Tag::FocalLength, rationals(&[(50, 1)])),
        field(Tag::FNumber, rationals(&[(28, 10)])),
        field(Tag::GPSLatitudeRef, ascii("S")),
        field(Tag::GPSLatitude, rationals(&[(33, 1), (51, 1), (36, 5)])),
        field(Tag::GPSAltitude, rationals(&[(1205, 10)])),
    ])
}

/// [`camera_jpeg`] cut off partway through its image data.
#[allow(dead_code)]
pub fn truncated_camera_jpeg() -> Vec<u8> {
    truncate_in_scan(&camera_jpeg())
}
