//! EXIF metadata extraction from in-memory images.

use exif::{Context, Field, In, Reader, Tag, Value};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::time::Duration;
use tokio::time::timeout;

use super::decode::{decode_bytes, format_to_string};
use crate::config::LimitsConfig;
use crate::error::ExtractError;
use crate::types::{RawExifValue, Scalar};

/// Tag name to raw (unsanitized) value.
pub type ExifMap = BTreeMap<String, RawExifValue>;

/// Key under which GPS sub-directory entries are nested.
pub const GPS_INFO_KEY: &str = "GPSInfo";

/// Extracts raw EXIF metadata from image bytes.
pub struct MetadataExtractor {
    limits: LimitsConfig,
}

impl MetadataExtractor {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Run [`MetadataExtractor::extract`] on a blocking thread, bounded by the
    /// configured decode timeout.
    ///
    /// A blocking task cannot be cancelled: after a timeout the request fails
    /// but the decode runs on in the background until it finishes. Its cost
    /// is capped by the dimension and allocation limits applied in
    /// [`decode_bytes`].
    pub async fn extract_owned(&self, bytes: Vec<u8>) -> Result<ExifMap, ExtractError> {
        let timeout_ms = self.limits.decode_timeout_ms;
        let limits = self.limits.clone();
        let result = timeout(
            Duration::from_millis(timeout_ms),
            tokio::task::spawn_blocking(move || read_tags(&bytes, &limits)),
        )
        .await;

        match result {
            Ok(Ok(extracted)) => extracted,
            Ok(Err(e)) => Err(ExtractError::Decode(format!("Task join error: {}", e))),
            Err(_) => Err(ExtractError::Timeout { timeout_ms }),
        }
    }

    /// Extract the primary image's EXIF tags.
    ///
    /// Fails only when the bytes are not a decodable image. A valid image
    /// without an EXIF block yields an empty map. GPS entries are nested as a
    /// mapping under [`GPS_INFO_KEY`]; thumbnail entries are ignored.
    pub fn extract(&self, bytes: &[u8]) -> Result<ExifMap, ExtractError> {
        read_tags(bytes, &self.limits)
    }

    /// Shape an entry: one component becomes a scalar, several a sequence.
    fn convert(field: &Field) -> Option<RawExifValue> {
        let value = match &field.value {
            Value::Byte(bytes) => RawExifValue::Bytes(bytes.clone()),
            Value::Undefined(bytes, _) => RawExifValue::Bytes(bytes.clone()),
            Value::Ascii(parts) => {
                let mut strings: Vec<RawExifValue> = parts
                    .iter()
                    .map(|p| RawExifValue::string(String::from_utf8_lossy(p)))
                    .collect();
                match strings.len() {
                    0 => RawExifValue::string(""),
                    1 => strings.remove(0),
                    _ => RawExifValue::Sequence(strings),
                }
            }
            Value::Short(v) => collapse(v.iter().map(|&x| RawExifValue::int(i64::from(x)))),
            Value::Long(v) => collapse(v.iter().map(|&x| RawExifValue::int(i64::from(x)))),
            Value::SByte(v) => collapse(v.iter().map(|&x| RawExifValue::int(i64::from(x)))),
            Value::SShort(v) => collapse(v.iter().map(|&x| RawExifValue::int(i64::from(x)))),
            Value::SLong(v) => collapse(v.iter().map(|&x| RawExifValue::int(i64::from(x)))),
            Value::Rational(v) => collapse(
                v.iter()
                    .map(|r| RawExifValue::rational(i64::from(r.num), i64::from(r.denom))),
            ),
            Value::SRational(v) => collapse(
                v.iter()
                    .map(|r| RawExifValue::rational(i64::from(r.num), i64::from(r.denom))),
            ),
            Value::Float(v) => collapse(
                v.iter()
                    .map(|&x| RawExifValue::Scalar(Scalar::Float(f64::from(x)))),
            ),
            Value::Double(v) => {
                collapse(v.iter().map(|&x| RawExifValue::Scalar(Scalar::Float(x))))
            }
            Value::Unknown(..) => return None,
        };
        Some(value)
    }
}

/// Decode `bytes`, then read the primary image's EXIF tags.
fn read_tags(bytes: &[u8], limits: &LimitsConfig) -> Result<ExifMap, ExtractError> {
    let decoded = decode_bytes(bytes, limits)?;
    if !decoded.may_carry_exif() {
        tracing::debug!(
            format = %format_to_string(decoded.format),
            "Container cannot carry EXIF"
        );
        return Ok(ExifMap::new());
    }

    let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(ExifMap::new()),
        Err(e) => return Err(ExtractError::Decode(format!("Corrupt EXIF block: {}", e))),
    };

    let mut tags = ExifMap::new();
    let mut gps = Vec::new();
    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        if field.tag == Tag::GPSInfoIFDPointer {
            continue;
        }
        let Some(value) = MetadataExtractor::convert(field) else {
            tracing::debug!(tag = %field.tag, "Skipping entry with unknown type");
            continue;
        };
        let name = tag_name(field.tag);
        if field.tag.context() == Context::Gps {
            gps.push((RawExifValue::string(name), value));
        } else {
            tags.insert(name, value);
        }
    }
    if !gps.is_empty() {
        tags.insert(GPS_INFO_KEY.to_string(), RawExifValue::Mapping(gps));
    }

    Ok(tags)
}

fn collapse(items: impl Iterator<Item = RawExifValue>) -> RawExifValue {
    let mut items: Vec<RawExifValue> = items.collect();
    if items.len() == 1 {
        items.remove(0)
    } else {
        RawExifValue::Sequence(items)
    }
}

/// Human-readable tag name, or the numeric id for tags outside the table.
fn tag_name(tag: Tag) -> String {
    if tag.description().is_some() {
        tag.to_string()
    } else {
        tag.number().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    fn text(s: &str) -> RawExifValue {
        RawExifValue::string(s)
    }

    fn extractor() -> MetadataExtractor {
        MetadataExtractor::new(LimitsConfig::default())
    }

    #[test]
    fn test_extract_camera_and_gps_tags() {
        let jpeg = test_utils::jpeg_with_exif(&test_utils::camera_fields());
        let tags = extractor().extract(&jpeg).unwrap();

        assert_eq!(tags.get("Make"), Some(&text("Google")));
        assert_eq!(tags.get("Model"), Some(&text("Pixel 7")));
        assert_eq!(tags.get("FNumber"), Some(&RawExifValue::rational(18, 10)));
        assert_eq!(tags.get("PhotographicSensitivity"), Some(&RawExifValue::int(100)));
        assert_eq!(
            tags.get("UserComment"),
            Some(&RawExifValue::Bytes(vec![b'o', b'k', 0xff]))
        );

        let Some(RawExifValue::Mapping(gps)) = tags.get(GPS_INFO_KEY) else {
            panic!("GPS entries should be nested");
        };
        let latitude = gps
            .iter()
            .find(|(k, _)| *k == text("GPSLatitude"))
            .map(|(_, v)| v);
        assert_eq!(
            latitude,
            Some(&RawExifValue::Sequence(vec![
                RawExifValue::rational(52, 1),
                RawExifValue::rational(30, 1),
                RawExifValue::rational(15, 4),
            ]))
        );
        assert!(!tags.contains_key("GPSLatitude"));
        assert!(!tags.contains_key("GPSInfoIFDPointer"));
    }

    #[test]
    fn test_extract_without_exif_is_empty() {
        let tags = extractor().extract(&test_utils::plain_jpeg()).unwrap();
        assert!(tags.is_empty());

        let tags = extractor().extract(&test_utils::plain_png()).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_extract_gif_is_empty() {
        let tags = extractor().extract(&test_utils::plain_gif()).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_extract_rejects_exif_jpeg_cut_in_scan_data() {
        let jpeg = test_utils::jpeg_with_exif(&test_utils::camera_fields());
        let truncated = test_utils::truncate_in_scan(&jpeg);

        let err = extractor().extract(&truncated).unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)));
    }

    #[test]
    fn test_extract_rejects_non_image() {
        let err = extractor().extract(b"<html>404</html>").unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)));
    }

    #[test]
    fn test_unknown_tag_falls_back_to_number() {
        assert_eq!(tag_name(Tag(Context::Exif, 0xfedc)), "65244");
        assert_eq!(tag_name(Tag::Model), "Model");
    }

    #[test]
    fn test_multi_count_becomes_sequence() {
        let field = Field {
            tag: Tag::BitsPerSample,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![8, 8, 8]),
        };
        assert_eq!(
            MetadataExtractor::convert(&field),
            Some(RawExifValue::Sequence(vec![
                RawExifValue::int(8),
                RawExifValue::int(8),
                RawExifValue::int(8),
            ]))
        );
    }

    #[tokio::test]
    async fn test_extract_owned_runs_off_thread() {
        let extractor = MetadataExtractor::new(LimitsConfig::default());
        let jpeg = test_utils::jpeg_with_exif(&test_utils::camera_fields());
        let tags = extractor.extract_owned(jpeg).await.unwrap();
        assert!(tags.contains_key("Model"));
    }
}
