//! Application state shared across handlers.

use exifdb_core::{Config, ExifService, StoreConnector};
use std::sync::Arc;

/// Immutable per-process state. Store connections are not kept here; the
/// service opens one per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<ExifService>,
}

impl AppState {
    pub fn new(config: Config, connector: Arc<dyn StoreConnector>) -> exifdb_core::Result<Self> {
        let service = ExifService::new(&config, connector)?;
        Ok(Self {
            config: Arc::new(config),
            service: Arc::new(service),
        })
    }
}
