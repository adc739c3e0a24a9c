//! Conversion between metadata records and BSON documents.

use mongodb::bson::{Bson, Document};
use std::collections::BTreeMap;

use crate::error::{StoreError, StoreResult};
use crate::types::{DocumentId, MetadataRecord, SanitizedValue, Scalar};

/// Field holding the store-assigned identifier.
pub const ID_FIELD: &str = "_id";

/// Build the document body for a record. The identifier is never written;
/// the store assigns it.
pub fn record_to_document(record: &MetadataRecord) -> Document {
    let mut doc = Document::new();
    for (tag, value) in record.tags() {
        doc.insert(tag.clone(), to_bson(value));
    }
    doc
}

/// Rebuild a persisted record from its document.
pub fn document_to_record(mut doc: Document) -> StoreResult<MetadataRecord> {
    let id = match doc.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => DocumentId::from(oid),
        Some(other) => {
            return Err(StoreError::Malformed(format!(
                "{ID_FIELD} is not an ObjectId: {other}"
            )))
        }
        None => return Err(StoreError::Malformed(format!("missing {ID_FIELD}"))),
    };

    let tags: BTreeMap<String, SanitizedValue> =
        doc.into_iter().map(|(k, v)| (k, from_bson(v))).collect();
    Ok(MetadataRecord::with_id(id, tags))
}

pub fn to_bson(value: &SanitizedValue) -> Bson {
    match value {
        SanitizedValue::Scalar(Scalar::Null) => Bson::Null,
        SanitizedValue::Scalar(Scalar::Bool(b)) => Bson::Boolean(*b),
        SanitizedValue::Scalar(Scalar::Int(i)) => match i32::try_from(*i) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(*i),
        },
        SanitizedValue::Scalar(Scalar::Float(f)) => Bson::Double(*f),
        SanitizedValue::Scalar(Scalar::String(s)) => Bson::String(s.clone()),
        SanitizedValue::Sequence(items) => Bson::Array(items.iter().map(to_bson).collect()),
        SanitizedValue::Mapping(entries) => {
            let mut doc = Document::new();
            for (k, v) in entries {
                doc.insert(k.key_text(), to_bson(v));
            }
            Bson::Document(doc)
        }
    }
}

pub fn from_bson(value: Bson) -> SanitizedValue {
    match value {
        Bson::Null | Bson::Undefined => SanitizedValue::Scalar(Scalar::Null),
        Bson::Boolean(b) => SanitizedValue::Scalar(Scalar::Bool(b)),
        Bson::Int32(i) => SanitizedValue::Scalar(Scalar::Int(i64::from(i))),
        Bson::Int64(i) => SanitizedValue::Scalar(Scalar::Int(i)),
        Bson::Double(f) => SanitizedValue::Scalar(Scalar::Float(f)),
        Bson::String(s) => SanitizedValue::Scalar(Scalar::String(s)),
        Bson::ObjectId(oid) => SanitizedValue::Scalar(Scalar::String(oid.to_hex())),
        Bson::Array(items) => SanitizedValue::Sequence(items.into_iter().map(from_bson).collect()),
        Bson::Document(doc) => SanitizedValue::Mapping(
            doc.into_iter()
                .map(|(k, v)| (SanitizedValue::Scalar(Scalar::String(k)), from_bson(v)))
                .collect(),
        ),
        // Never written by this service; render anything else as text
        other => SanitizedValue::Scalar(Scalar::String(other.to_string())),
    }
}
