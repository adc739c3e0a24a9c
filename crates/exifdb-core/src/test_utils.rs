//! Synthetic images for tests.
//!
//! Enabled for this crate's unit tests and, through the `test-utils`
//! feature, for the server's integration tests.

use exif::experimental::Writer;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub use exif::{Field, In, Rational, Tag, Value};

/// Width of every sample image.
pub const SAMPLE_WIDTH: u32 = 64;
/// Height of every sample image.
pub const SAMPLE_HEIGHT: u32 = 48;

const JPEG_SOS: [u8; 2] = [0xFF, 0xDA];

/// Encode a patterned sample image. The pattern keeps the compressed scan
/// data from collapsing to a handful of bytes.
pub fn encode(format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(SAMPLE_WIDTH, SAMPLE_HEIGHT, |x, y| {
        Rgb([
            (x * 4) as u8,
            (y * 5) as u8,
            ((x * 7) ^ (y * 11)) as u8,
        ])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, format)
        .expect("Failed to encode sample image");
    buf.into_inner()
}

pub fn plain_jpeg() -> Vec<u8> {
    encode(ImageFormat::Jpeg)
}

pub fn plain_png() -> Vec<u8> {
    encode(ImageFormat::Png)
}

pub fn plain_gif() -> Vec<u8> {
    encode(ImageFormat::Gif)
}

/// A primary-IFD field.
pub fn field(tag: Tag, value: Value) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value,
    }
}

pub fn ascii(s: &str) -> Value {
    Value::Ascii(vec![s.as_bytes().to_vec()])
}

pub fn rationals(parts: &[(u32, u32)]) -> Value {
    Value::Rational(parts.iter().map(|&(num, denom)| Rational { num, denom }).collect())
}

/// Camera-model, exposure and GPS tags as a phone would write them.
pub fn camera_fields() -> Vec<Field> {
    vec![
        field(Tag::Make, ascii("Google")),
        field(Tag::Model, ascii("Pixel 7")),
        field(Tag::XResolution, rationals(&[(72, 1)])),
        field(Tag::FNumber, rationals(&[(18, 10)])),
        field(Tag::ExposureTime, rationals(&[(1, 125)])),
        field(Tag::PhotographicSensitivity, Value::Short(vec![100])),
        field(Tag::UserComment, Value::Undefined(vec![b'o', b'k', 0xff], 0)),
        field(Tag::GPSVersionID, Value::Byte(vec![2, 3, 0, 0])),
        field(Tag::GPSLatitudeRef, ascii("N")),
        field(Tag::GPSLatitude, rationals(&[(52, 1), (30, 1), (15, 4)])),
        field(Tag::GPSLongitudeRef, ascii("E")),
        field(Tag::GPSLongitude, rationals(&[(13, 1), (24, 1), (0, 1)])),
    ]
}

/// A JPEG carrying an APP1 EXIF segment built from `fields`, placed right
/// after SOI.
pub fn jpeg_with_exif(fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for f in fields {
        writer.push_field(f);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer
        .write(&mut tiff, false)
        .expect("Failed to write EXIF block");
    let tiff = tiff.into_inner();

    let jpeg = plain_jpeg();
    // Length covers itself (2) and the "Exif\0\0" header (6)
    let segment_len = u16::try_from(tiff.len() + 8).expect("EXIF block too large for APP1");
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Cut a JPEG halfway through its entropy-coded scan data, leaving every
/// header segment (EXIF included) intact.
pub fn truncate_in_scan(jpeg: &[u8]) -> Vec<u8> {
    let sos = jpeg
        .windows(JPEG_SOS.len())
        .position(|w| w == JPEG_SOS)
        .expect("JPEG has no SOS marker");
    let cut = sos + (jpeg.len() - sos) / 2;
    jpeg[..cut].to_vec()
}
