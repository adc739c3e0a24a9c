//! exifdb core - EXIF extraction, sanitization and document storage.
//!
//! # Architecture
//!
//! ```text
//! URL → Fetch → Decode → Extract EXIF → Sanitize → Store (one connection per request)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use exifdb_core::{Config, ExifService, MongoConnector};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let connector = Arc::new(MongoConnector::new(config.store.clone()));
//!     let service = ExifService::new(&config, connector)?;
//!
//!     let id = service.upload("https://example.com/photo.jpg").await?;
//!     println!("{:?}", service.lookup(&id.to_string()).await?);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod store;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, ExtractError, FetchError, Result, ServiceError, StoreError, StoreResult,
};
pub use pipeline::{sanitize, ExifMap, ExifProcessor, MetadataExtractor};
pub use store::{DocumentStore, MemoryConnector, MongoConnector, StoreConnector};
pub use types::{DocumentId, MetadataRecord, RawExifValue, SanitizedValue, Scalar};

use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upload and lookup operations behind the HTTP surface.
///
/// Holds no per-request state: each call opens and closes its own store
/// connection through the connector.
pub struct ExifService {
    processor: ExifProcessor,
    connector: Arc<dyn StoreConnector>,
}

impl ExifService {
    pub fn new(config: &Config, connector: Arc<dyn StoreConnector>) -> Result<Self> {
        tracing::debug!("Initializing exifdb v{}", VERSION);
        Ok(Self {
            processor: ExifProcessor::new(config)?,
            connector,
        })
    }

    /// Fetch `file_url`, extract and sanitize its EXIF tags, and persist them.
    ///
    /// The first failing stage ends the request; nothing is retried.
    #[tracing::instrument(skip(self))]
    pub async fn upload(&self, file_url: &str) -> Result<DocumentId> {
        let record = self.processor.process(file_url).await?;
        let id = store::insert_record(self.connector.as_ref(), &record).await?;
        tracing::info!(document_id = %id, tags = record.len(), "Stored EXIF metadata");
        Ok(id)
    }

    /// Look up a stored record. `Ok(None)` means the identifier is well-formed
    /// but unknown.
    #[tracing::instrument(skip(self))]
    pub async fn lookup(&self, document_id: &str) -> Result<Option<MetadataRecord>> {
        Ok(store::fetch_record(self.connector.as_ref(), document_id).await?)
    }

    /// Name of the configured store backend.
    pub fn backend(&self) -> &str {
        self.connector.name()
    }
}
