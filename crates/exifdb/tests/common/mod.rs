//! Shared test utilities.

pub mod fixtures;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use exifdb::{create_router, AppState};
use exifdb_core::{Config, MemoryConnector, StoreConnector};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// A router wired to an in-memory store.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub store: MemoryConnector,
}

#[allow(dead_code)]
impl TestServer {
    pub fn new() -> Self {
        Self::with_store(MemoryConnector::new())
    }

    pub fn with_store(store: MemoryConnector) -> Self {
        Self::with_connector(Arc::new(store.clone()), store)
    }

    /// Use `connector` for requests; `store` is kept only for assertions.
    pub fn with_connector(connector: Arc<dyn StoreConnector>, store: MemoryConnector) -> Self {
        let mut config = Config::default();
        config.server.environment = "test".to_string();
        let state = AppState::new(config, connector).expect("Failed to build app state");
        Self {
            router: create_router(state),
            store,
        }
    }

    /// Send a request and decode the JSON body (Null when empty or not JSON).
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
