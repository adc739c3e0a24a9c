//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::{Config, StoreConfig};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    ///
    /// Store credentials are not checked here; see
    /// [`crate::store::MongoConnector::connection_uri`].
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.timeout_ms must be > 0".into(),
            ));
        }
        if self.fetch.max_image_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.max_image_bytes must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.max_decode_alloc_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_decode_alloc_mb must be > 0".into(),
            ));
        }
        if self.store.connect_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "store.connect_timeout_ms must be > 0".into(),
            ));
        }
        if !matches!(self.store.scheme.as_str(), "mongodb" | "mongodb+srv") {
            return Err(ConfigError::ValidationError(format!(
                "store.scheme must be \"mongodb\" or \"mongodb+srv\", got {:?}",
                self.store.scheme
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }
}

impl StoreConfig {
    /// Return a required setting, treating blank strings as absent.
    pub(crate) fn require<'a>(
        value: &'a Option<String>,
        name: &'static str,
    ) -> Result<&'a str, ConfigError> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(name))
    }
}
