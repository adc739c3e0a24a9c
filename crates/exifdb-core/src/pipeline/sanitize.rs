//! Coercion of raw EXIF values into document-safe values.

use crate::types::{RawExifValue, SanitizedValue, Scalar};

/// Convert a raw EXIF value into a [`SanitizedValue`].
///
/// Total and pure: rationals become `numerator / denominator` as `f64`
/// (IEEE semantics, so a zero denominator yields NaN or ±inf), byte strings
/// are decoded as UTF-8 with invalid sequences replaced by U+FFFD, and
/// sequences and mappings are rebuilt element by element. Mapping keys are
/// sanitized too; if two keys collide afterwards the later entry wins.
pub fn sanitize(value: RawExifValue) -> SanitizedValue {
    match value {
        RawExifValue::Mapping(entries) => {
            let mut out = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                SanitizedValue::insert_entry(&mut out, sanitize(key), sanitize(value));
            }
            SanitizedValue::Mapping(out)
        }
        RawExifValue::Sequence(items) => {
            SanitizedValue::Sequence(items.into_iter().map(sanitize).collect())
        }
        RawExifValue::Rational { num, denom } => {
            SanitizedValue::Scalar(Scalar::Float(num as f64 / denom as f64))
        }
        RawExifValue::Bytes(bytes) => {
            SanitizedValue::Scalar(Scalar::String(String::from_utf8_lossy(&bytes).into_owned()))
        }
        RawExifValue::Scalar(scalar) => SanitizedValue::Scalar(scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(f: f64) -> SanitizedValue {
        SanitizedValue::Scalar(Scalar::Float(f))
    }

    fn text(s: &str) -> SanitizedValue {
        SanitizedValue::Scalar(Scalar::String(s.to_string()))
    }

    #[test]
    fn test_rational_becomes_quotient() {
        assert_eq!(sanitize(RawExifValue::rational(3, 2)), float(1.5));
        assert_eq!(sanitize(RawExifValue::rational(-1, 4)), float(-0.25));
    }

    #[test]
    fn test_zero_denominator_does_not_panic() {
        assert_eq!(sanitize(RawExifValue::rational(1, 0)), float(f64::INFINITY));
        assert!(sanitize(RawExifValue::rational(0, 0))
            .as_f64()
            .is_some_and(f64::is_nan));
    }

    #[test]
    fn test_valid_utf8_bytes_decode() {
        assert_eq!(sanitize(RawExifValue::Bytes(b"Canon".to_vec())), text("Canon"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let out = sanitize(RawExifValue::Bytes(vec![b'a', 0xff, b'b']));
        assert_eq!(out, text("a\u{FFFD}b"));
    }

    #[test]
    fn test_scalars_pass_through() {
        for scalar in [
            Scalar::Int(5),
            Scalar::String("abc".into()),
            Scalar::Bool(true),
            Scalar::Float(0.5),
            Scalar::Null,
        ] {
            assert_eq!(
                sanitize(RawExifValue::Scalar(scalar.clone())),
                SanitizedValue::Scalar(scalar)
            );
        }
    }

    #[test]
    fn test_nested_structure_is_preserved() {
        let raw = RawExifValue::Mapping(vec![
            (
                RawExifValue::string("GPSLatitude"),
                RawExifValue::Sequence(vec![
                    RawExifValue::rational(52, 1),
                    RawExifValue::rational(30, 1),
                    RawExifValue::rational(1, 4),
                ]),
            ),
            (
                RawExifValue::Bytes(b"GPSVersionID".to_vec()),
                RawExifValue::Bytes(vec![2, 3, 0, 0]),
            ),
            (
                RawExifValue::int(7),
                RawExifValue::Mapping(vec![(
                    RawExifValue::string("inner"),
                    RawExifValue::Sequence(vec![RawExifValue::rational(1, 8)]),
                )]),
            ),
        ]);

        let expected = SanitizedValue::Mapping(vec![
            (
                text("GPSLatitude"),
                SanitizedValue::Sequence(vec![float(52.0), float(30.0), float(0.25)]),
            ),
            (text("GPSVersionID"), text("\u{2}\u{3}\u{0}\u{0}")),
            (
                SanitizedValue::Scalar(Scalar::Int(7)),
                SanitizedValue::Mapping(vec![(
                    text("inner"),
                    SanitizedValue::Sequence(vec![float(0.125)]),
                )]),
            ),
        ]);

        assert_eq!(sanitize(raw), expected);
    }

    #[test]
    fn test_sequence_order_is_kept() {
        let raw = RawExifValue::Sequence(vec![
            RawExifValue::int(3),
            RawExifValue::rational(1, 2),
            RawExifValue::string("x"),
        ]);
        let SanitizedValue::Sequence(items) = sanitize(raw) else {
            panic!("expected a sequence");
        };
        assert_eq!(items, vec![SanitizedValue::Scalar(Scalar::Int(3)), float(0.5), text("x")]);
    }

    #[test]
    fn test_colliding_keys_last_wins() {
        let raw = RawExifValue::Mapping(vec![
            (RawExifValue::string("k"), RawExifValue::int(1)),
            (RawExifValue::Bytes(b"k".to_vec()), RawExifValue::int(2)),
        ]);
        assert_eq!(
            sanitize(raw),
            SanitizedValue::Mapping(vec![(text("k"), SanitizedValue::Scalar(Scalar::Int(2)))])
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = vec![
            RawExifValue::int(5),
            RawExifValue::string("abc"),
            RawExifValue::Scalar(Scalar::Bool(true)),
            RawExifValue::rational(3, 2),
            RawExifValue::Bytes(vec![0xc3, 0x28]),
            RawExifValue::Mapping(vec![(
                RawExifValue::Bytes(b"key".to_vec()),
                RawExifValue::Sequence(vec![RawExifValue::rational(9, 3)]),
            )]),
        ];
        for raw in inputs {
            let once = sanitize(raw);
            let twice = sanitize(RawExifValue::from(once.clone()));
            assert_eq!(once, twice);
        }
    }
}
