//! MongoDB document store backend.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::time::Duration;
use tokio::time::timeout;

use super::document::{document_to_record, record_to_document, ID_FIELD};
use super::{DocumentStore, StoreConnector};
use crate::config::StoreConfig;
use crate::error::{ConfigError, StoreError, StoreResult};
use crate::types::{DocumentId, MetadataRecord};

/// Opens a fresh MongoDB client for every connection request.
pub struct MongoConnector {
    config: StoreConfig,
}

impl MongoConnector {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Build the connection string from configuration.
    ///
    /// Username, password, host and app name are all required; credentials
    /// are percent-encoded. Driver-level retries are turned off so every
    /// failure surfaces exactly once.
    pub fn connection_uri(&self) -> Result<String, ConfigError> {
        let username = StoreConfig::require(&self.config.username, "store.username (DB_USERNAME)")?;
        let password = StoreConfig::require(&self.config.password, "store.password (DB_PASSWORD)")?;
        let host = StoreConfig::require(&self.config.host, "store.host (DB_HOST)")?;
        let app_name = StoreConfig::require(&self.config.app_name, "store.app_name (DB_NAME)")?;

        Ok(format!(
            "{}://{}:{}@{}/?retryWrites=false&retryReads=false&w=majority&appName={}",
            self.config.scheme,
            utf8_percent_encode(username, NON_ALPHANUMERIC),
            utf8_percent_encode(password, NON_ALPHANUMERIC),
            host,
            utf8_percent_encode(app_name, NON_ALPHANUMERIC),
        ))
    }

    async fn open(&self, uri: &str, deadline: Duration) -> StoreResult<Box<dyn DocumentStore>> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        options.server_selection_timeout = Some(deadline);
        options.connect_timeout = Some(deadline);

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;

        // Client construction is lazy; prove the deployment is reachable.
        if let Err(e) = client.database("admin").run_command(doc! { "ping": 1 }).await {
            client.shutdown().await;
            return Err(StoreError::Connection(e.to_string()));
        }

        let collection = client
            .database(&self.config.database)
            .collection::<Document>(&self.config.collection);
        Ok(Box::new(MongoStore { client, collection }))
    }
}

#[async_trait]
impl StoreConnector for MongoConnector {
    fn name(&self) -> &str {
        "mongodb"
    }

    async fn connect(&self) -> StoreResult<Box<dyn DocumentStore>> {
        let uri = self.connection_uri()?;
        let timeout_ms = self.config.connect_timeout_ms;
        let deadline = Duration::from_millis(timeout_ms);

        match timeout(deadline, self.open(&uri, deadline)).await {
            Ok(result) => result,
            // The in-flight client is dropped with the future
            Err(_) => Err(StoreError::Timeout { timeout_ms }),
        }
    }
}

struct MongoStore {
    client: Client,
    collection: Collection<Document>,
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, record: &MetadataRecord) -> StoreResult<DocumentId> {
        let result = self.collection.insert_one(record_to_document(record)).await?;
        result
            .inserted_id
            .as_object_id()
            .map(DocumentId::from)
            .ok_or_else(|| {
                StoreError::Malformed(format!(
                    "store assigned a non-ObjectId {ID_FIELD}: {}",
                    result.inserted_id
                ))
            })
    }

    async fn find_by_id(&self, id: DocumentId) -> StoreResult<Option<MetadataRecord>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.object_id() })
            .await?;
        found.map(document_to_record).transpose()
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
