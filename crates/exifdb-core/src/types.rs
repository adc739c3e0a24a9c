//! Core data types for the exifdb pipeline.
//!
//! Raw values come out of the extractor exactly as the EXIF block encodes
//! them; sanitized values only contain kinds a generic document format can
//! hold. Both are closed sum types so every conversion is an exhaustive match.

use mongodb::bson::oid::ObjectId;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// A plain scalar that is already safe to store as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// A value as decoded from an image's EXIF block.
#[derive(Debug, Clone, PartialEq)]
pub enum RawExifValue {
    /// Numerator/denominator pair (RATIONAL or SRATIONAL)
    Rational { num: i64, denom: i64 },

    /// Uninterpreted bytes (BYTE or UNDEFINED), possibly not UTF-8
    Bytes(Vec<u8>),

    /// Ordered sequence, e.g. a multi-count entry
    Sequence(Vec<RawExifValue>),

    /// Key/value pairs, e.g. the GPS sub-directory
    Mapping(Vec<(RawExifValue, RawExifValue)>),

    /// Anything already JSON-safe
    Scalar(Scalar),
}

impl RawExifValue {
    /// Shorthand for a rational value.
    pub fn rational(num: i64, denom: i64) -> Self {
        Self::Rational { num, denom }
    }

    /// Shorthand for a string scalar.
    pub fn string(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(s.into()))
    }

    /// Shorthand for an integer scalar.
    pub fn int(i: i64) -> Self {
        Self::Scalar(Scalar::Int(i))
    }
}

/// A value that contains no EXIF-specific kinds.
///
/// Rationals have become floats and byte strings have become text; the
/// remaining shape (sequences, mappings, scalars) mirrors the raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum SanitizedValue {
    Scalar(Scalar),
    Sequence(Vec<SanitizedValue>),
    /// Keys are unique; see [`SanitizedValue::insert_entry`].
    Mapping(Vec<(SanitizedValue, SanitizedValue)>),
}

impl SanitizedValue {
    /// Insert into a mapping's entry list, replacing any entry whose key is
    /// equal. The last write for a key wins.
    pub(crate) fn insert_entry(
        entries: &mut Vec<(SanitizedValue, SanitizedValue)>,
        key: SanitizedValue,
        value: SanitizedValue,
    ) {
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    /// Render a mapping key as document field text.
    ///
    /// Strings are used verbatim; other kinds use their JSON spelling.
    pub fn key_text(&self) -> String {
        match self {
            Self::Scalar(Scalar::String(s)) => s.clone(),
            Self::Scalar(Scalar::Null) => "null".to_string(),
            Self::Scalar(Scalar::Bool(b)) => b.to_string(),
            Self::Scalar(Scalar::Int(i)) => i.to_string(),
            Self::Scalar(Scalar::Float(f)) => f.to_string(),
            Self::Sequence(_) | Self::Mapping(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    /// Look up a mapping entry by string key.
    pub fn get(&self, key: &str) -> Option<&SanitizedValue> {
        match self {
            Self::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k.key_text() == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// The float payload, if this is a float scalar.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Float(f)) => Some(*f),
            _ => None,
        }
    }

    /// The string payload, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<SanitizedValue> for RawExifValue {
    fn from(value: SanitizedValue) -> Self {
        match value {
            SanitizedValue::Scalar(s) => RawExifValue::Scalar(s),
            SanitizedValue::Sequence(items) => {
                RawExifValue::Sequence(items.into_iter().map(Into::into).collect())
            }
            SanitizedValue::Mapping(entries) => RawExifValue::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            // JSON has no NaN/inf; a zero-denominator rational renders as null
            Scalar::Float(f) if !f.is_finite() => serializer.serialize_none(),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for SanitizedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SanitizedValue::Scalar(s) => s.serialize(serializer),
            SanitizedValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            SanitizedValue::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(&k.key_text(), v)?;
                }
                map.end()
            }
        }
    }
}

/// Externally-facing encoding of the store's unique key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Parse an identifier string, rejecting anything that is not exactly
    /// 24 hexadecimal characters.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| StoreError::InvalidIdentifier(s.to_string()))
    }

    pub(crate) fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub(crate) fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

/// Sanitized metadata for one image, keyed by tag name.
///
/// The identifier is only ever set by the store at insert time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataRecord {
    id: Option<DocumentId>,
    tags: BTreeMap<String, SanitizedValue>,
}

impl MetadataRecord {
    /// Create an unpersisted record.
    pub fn new(tags: BTreeMap<String, SanitizedValue>) -> Self {
        Self { id: None, tags }
    }

    pub(crate) fn with_id(id: DocumentId, tags: BTreeMap<String, SanitizedValue>) -> Self {
        Self { id: Some(id), tags }
    }

    /// Store-assigned identifier, if the record has been persisted.
    pub fn id(&self) -> Option<DocumentId> {
        self.id
    }

    pub fn tags(&self) -> &BTreeMap<String, SanitizedValue> {
        &self.tags
    }

    pub fn get(&self, tag: &str) -> Option<&SanitizedValue> {
        self.tags.get(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Serialize for MetadataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.tags.len() + usize::from(self.id.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(id) = &self.id {
            map.serialize_entry("_id", id)?;
        }
        for (tag, value) in &self.tags {
            map.serialize_entry(tag, value)?;
        }
        map.end()
    }
}
