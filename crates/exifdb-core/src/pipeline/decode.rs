//! Image container decoding with content-based format detection.

use image::{GenericImageView, ImageFormat, Limits};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::ExtractError;

/// Result of decoding an image container.
#[derive(Debug, Clone, Copy)]
pub struct DecodedImage {
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl DecodedImage {
    /// Whether this container can carry an EXIF block we know how to read.
    pub fn may_carry_exif(&self) -> bool {
        matches!(
            self.format,
            ImageFormat::Jpeg | ImageFormat::Tiff | ImageFormat::Png | ImageFormat::WebP
        )
    }
}

const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];
const PNG_IEND: [u8; 12] = [
    0x00, 0x00, 0x00, 0x00, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82,
];

/// Decode raw bytes far enough to prove they are a complete, valid image.
///
/// The format is sniffed from content only. The container trailer is
/// checked before decoding, because the JPEG decoder accepts an early end
/// of data and still returns a full frame. The pixel data is then decoded
/// under `limits` and discarded, so corrupt payloads are rejected here too.
pub fn decode_bytes(bytes: &[u8], limits: &LimitsConfig) -> Result<DecodedImage, ExtractError> {
    let mut reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ExtractError::Decode(format!("Cannot detect image format: {}", e)))?;
    let format = reader
        .format()
        .ok_or_else(|| ExtractError::Decode("Unrecognized image format".to_string()))?;
    check_complete(format, bytes)?;

    reader.limits(decode_limits(limits));
    let image = reader
        .decode()
        .map_err(|e| ExtractError::Decode(e.to_string()))?;

    let (width, height) = image.dimensions();
    Ok(DecodedImage {
        format,
        width,
        height,
    })
}

fn decode_limits(config: &LimitsConfig) -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(config.max_image_dimension);
    limits.max_image_height = Some(config.max_image_dimension);
    limits.max_alloc = Some(config.max_decode_alloc_mb.saturating_mul(1024 * 1024));
    limits
}

/// Reject containers whose trailer shows the payload was cut short.
fn check_complete(format: ImageFormat, bytes: &[u8]) -> Result<(), ExtractError> {
    let complete = match format {
        // Zero padding after EOI is tolerated
        ImageFormat::Jpeg => {
            let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            bytes[..end].ends_with(&JPEG_EOI)
        }
        ImageFormat::Png => bytes.ends_with(&PNG_IEND),
        // RIFF header declares the payload size
        ImageFormat::WebP => match bytes.get(4..8) {
            Some(size) => {
                let declared = u32::from_le_bytes([size[0], size[1], size[2], size[3]]);
                bytes.len() as u64 >= 8 + u64::from(declared)
            }
            None => false,
        },
        _ => true,
    };

    if complete {
        Ok(())
    } else {
        Err(ExtractError::Decode(format!(
            "Truncated {} data",
            format_to_string(format)
        )))
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}
