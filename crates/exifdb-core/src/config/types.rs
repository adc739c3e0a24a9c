//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: String,

    /// Deployment environment name, shown on the info page
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            environment: "dev".to_string(),
        }
    }
}

/// Source image fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Largest accepted image body in bytes
    pub max_image_bytes: u64,

    /// User-Agent sent to upstream hosts
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_image_bytes: 50 * 1024 * 1024,
            user_agent: format!("exifdb/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Decode + EXIF read timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Maximum image width or height in pixels
    pub max_image_dimension: u32,

    /// Maximum memory a single decode may allocate, in megabytes
    pub max_decode_alloc_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            decode_timeout_ms: 5000,
            max_image_dimension: 20_000,
            max_decode_alloc_mb: 512,
        }
    }
}

/// Document store connection settings.
///
/// Credentials are optional here; their absence only becomes an error when
/// a connection is requested.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store username (`DB_USERNAME`)
    pub username: Option<String>,

    /// Store password (`DB_PASSWORD`)
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Store host, or SRV record name for `mongodb+srv` (`DB_HOST`)
    pub host: Option<String>,

    /// Application name reported to the store (`DB_NAME`)
    pub app_name: Option<String>,

    /// Connection string scheme: "mongodb+srv" or "mongodb"
    pub scheme: String,

    /// Logical database holding the collection
    pub database: String,

    /// Collection that receives metadata records
    pub collection: String,

    /// Connect + server selection timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            host: None,
            app_name: None,
            scheme: "mongodb+srv".to_string(),
            database: "ir-exif".to_string(),
            collection: "images".to_string(),
            connect_timeout_ms: 5000,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("app_name", &self.app_name)
            .field("scheme", &self.scheme)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .finish()
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
