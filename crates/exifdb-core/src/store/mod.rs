//! Document store gateway.
//!
//! A [`StoreConnector`] opens one connection per logical request; the
//! returned [`DocumentStore`] is used for a single operation and closed on
//! every exit path by [`insert_record`] / [`fetch_record`]. No connection
//! state is shared between requests.

pub mod document;
pub mod memory;
pub mod mongo;

pub use memory::MemoryConnector;
pub use mongo::MongoConnector;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{DocumentId, MetadataRecord};

/// Opens connections to a document store.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Backend name for logging (e.g., "mongodb", "memory").
    fn name(&self) -> &str;

    /// Establish a connection. Fails with a config error before any network
    /// activity if required settings are absent.
    async fn connect(&self) -> StoreResult<Box<dyn DocumentStore>>;
}

/// One open connection to a document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist `record` as a new document and return its assigned id.
    /// Never overwrites an existing document.
    async fn insert(&self, record: &MetadataRecord) -> StoreResult<DocumentId>;

    /// Look up exactly one document. `Ok(None)` when nothing matches.
    async fn find_by_id(&self, id: DocumentId) -> StoreResult<Option<MetadataRecord>>;

    /// Release the connection.
    async fn close(&self);
}

/// Connect, insert, close.
pub async fn insert_record(
    connector: &dyn StoreConnector,
    record: &MetadataRecord,
) -> StoreResult<DocumentId> {
    tracing::debug!(backend = connector.name(), "Connecting to document store");
    let store = connector.connect().await?;
    let result = store.insert(record).await;
    store.close().await;

    if let Ok(id) = &result {
        tracing::debug!(document_id = %id, tags = record.len(), "Inserted metadata record");
    }
    result
}

/// Validate `id`, then connect, look up, close.
///
/// A malformed identifier is rejected before any connection is attempted.
pub async fn fetch_record(
    connector: &dyn StoreConnector,
    id: &str,
) -> StoreResult<Option<MetadataRecord>> {
    let id = DocumentId::parse(id)?;

    tracing::debug!(backend = connector.name(), "Connecting to document store");
    let store = connector.connect().await?;
    let result = store.find_by_id(id).await;
    store.close().await;

    if let Ok(found) = &result {
        tracing::debug!(document_id = %id, found = found.is_some(), "Looked up metadata record");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::types::{SanitizedValue, Scalar};
    use std::collections::BTreeMap;

    fn sample_record() -> MetadataRecord {
        let mut tags = BTreeMap::new();
        tags.insert(
            "Model".to_string(),
            SanitizedValue::Scalar(Scalar::String("Pixel 7".into())),
        );
        MetadataRecord::new(tags)
    }

    #[tokio::test]
    async fn test_insert_then_fetch() {
        let connector = MemoryConnector::new();
        let id = insert_record(&connector, &sample_record()).await.unwrap();

        let found = fetch_record(&connector, &id.to_string())
            .await
            .unwrap()
            .expect("record should exist");
        assert_eq!(found.id(), Some(id));
        assert_eq!(found.get("Model").and_then(SanitizedValue::as_str), Some("Pixel 7"));
    }

    #[tokio::test]
    async fn test_inserts_never_overwrite() {
        let connector = MemoryConnector::new();
        let a = insert_record(&connector, &sample_record()).await.unwrap();
        let b = insert_record(&connector, &sample_record()).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(connector.document_count().await, 2);
    }

    #[tokio::test]
    async fn test_invalid_identifier_rejected_before_connect() {
        let connector = MemoryConnector::new();
        let err = fetch_record(&connector, "not-an-id").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidIdentifier(_)));
        assert_eq!(connector.connections_opened(), 0);
    }

    #[tokio::test]
    async fn test_unknown_identifier_is_none() {
        let connector = MemoryConnector::new();
        let found = fetch_record(&connector, "65a1b2c3d4e5f60718293a4b")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_connections_released_on_every_path() {
        let connector = MemoryConnector::new();
        insert_record(&connector, &sample_record()).await.unwrap();
        fetch_record(&connector, "65a1b2c3d4e5f60718293a4b")
            .await
            .unwrap();
        assert_eq!(connector.connections_opened(), 2);
        assert_eq!(connector.open_connections(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_store_surfaces_connection_error() {
        let connector = MemoryConnector::unavailable();
        let err = insert_record(&connector, &sample_record()).await.unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)));
        assert_eq!(connector.open_connections(), 0);
    }
}
