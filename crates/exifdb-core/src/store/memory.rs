//! In-process document store.
//!
//! Documents go through the same BSON conversion as the MongoDB backend, so
//! records read back exactly as they would from a real store. Used for tests
//! and for running the service without a database.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::Document;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::document::{document_to_record, record_to_document, ID_FIELD};
use super::{DocumentStore, StoreConnector};
use crate::error::{StoreError, StoreResult};
use crate::types::{DocumentId, MetadataRecord};

type Documents = Arc<Mutex<HashMap<ObjectId, Document>>>;

/// Connector over a shared in-memory collection.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    documents: Documents,
    opened: Arc<AtomicUsize>,
    open: Arc<AtomicUsize>,
    unavailable: bool,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A connector whose every connection attempt fails.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Total connections handed out so far.
    pub fn connections_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Connections handed out and not yet released.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub async fn document_count(&self) -> usize {
        self.documents.lock().await.len()
    }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    fn name(&self) -> &str {
        "memory"
    }

    async fn connect(&self) -> StoreResult<Box<dyn DocumentStore>> {
        if self.unavailable {
            return Err(StoreError::Connection("memory store marked unavailable".into()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryStore {
            documents: Arc::clone(&self.documents),
            open: Arc::clone(&self.open),
            released: AtomicBool::new(false),
        }))
    }
}

struct MemoryStore {
    documents: Documents,
    open: Arc<AtomicUsize>,
    released: AtomicBool,
}

impl MemoryStore {
    fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, record: &MetadataRecord) -> StoreResult<DocumentId> {
        let id = DocumentId::generate();
        let mut doc = record_to_document(record);
        doc.insert(ID_FIELD, id.object_id());
        self.documents.lock().await.insert(id.object_id(), doc);
        Ok(id)
    }

    async fn find_by_id(&self, id: DocumentId) -> StoreResult<Option<MetadataRecord>> {
        let doc = self.documents.lock().await.get(&id.object_id()).cloned();
        doc.map(document_to_record).transpose()
    }

    async fn close(&self) {
        self.release();
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        self.release();
    }
}
