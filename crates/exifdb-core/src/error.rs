//! Error types for the exifdb pipeline.
//!
//! Errors are organized by stage (config, fetch, extract, store) so the HTTP
//! layer can map each kind to exactly one response status.

use thiserror::Error;

/// Top-level error for a single upload or lookup request.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Fetching the source image failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched bytes could not be decoded
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The document store rejected or could not serve the request
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A required setting was not supplied
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

/// Errors raised while fetching the source image.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme
    #[error("Invalid image URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Transport-level failure (DNS, connect, TLS, reset)
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Upstream answered with a non-success status
    #[error("Upstream {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The whole fetch exceeded the configured timeout
    #[error("Fetching {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// Body exceeded the configured size cap
    #[error("Image at {url} exceeds {max_bytes} bytes")]
    TooLarge { url: String, max_bytes: u64 },
}

/// Errors raised while decoding an image and reading its EXIF block.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Bytes are not a recognized image or are truncated/corrupt
    #[error("Decode error: {0}")]
    Decode(String),

    /// Decoding did not finish in time
    #[error("Decode timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Document store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store settings are missing or invalid; no connection was attempted
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The store could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store did not answer within the connect timeout
    #[error("Connection to document store timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The identifier string is not a well-formed document identifier
    #[error("Invalid document identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Any other failure reported by the store driver
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// The store returned something that is not a valid record
    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// Convenience type alias for service-level results.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Convenience type alias for store-specific results.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
