//! Configuration management for exifdb.
//!
//! Configuration is read from an optional TOML file and then overlaid with
//! environment variables (`ENV`, `DB_USERNAME`, `DB_PASSWORD`, `DB_HOST`,
//! `DB_NAME`). Every section implements `Default`.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for exifdb.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Source image fetch settings
    pub fetch: FetchConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Document store settings
    pub store: StoreConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default location when no
    /// path is given, then apply the process environment.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::read_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path without consulting the
    /// environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let content = std::fs::read_to_string(expanded)?;
        Ok(toml::from_str(&content)?)
    }

    /// Overlay values from an environment lookup. Unset or empty variables
    /// leave the current value alone.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(env) = get("ENV") {
            self.server.environment = env;
        }
        if let Some(username) = get("DB_USERNAME") {
            self.store.username = Some(username);
        }
        if let Some(password) = get("DB_PASSWORD") {
            self.store.password = Some(password);
        }
        if let Some(host) = get("DB_HOST") {
            self.store.host = Some(host);
        }
        if let Some(name) = get("DB_NAME") {
            self.store.app_name = Some(name);
        }
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.exifdb.exifdb/config.toml
    /// - Linux: ~/.config/exifdb/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\exifdb\config\config.toml
    ///
    /// Falls back to ~/.exifdb/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "exifdb", "exifdb")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".exifdb").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string. The store password is
    /// never included.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind, "0.0.0.0:5000");
        assert_eq!(config.fetch.timeout_ms, 10_000);
        assert_eq!(config.store.connect_timeout_ms, 5000);
        assert_eq!(config.store.database, "ir-exif");
        assert_eq!(config.store.collection, "images");
    }

    #[test]
    fn test_apply_env_overlays_store_settings() {
        let env: HashMap<&str, &str> = [
            ("ENV", "prod"),
            ("DB_USERNAME", "reader"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_HOST", "cluster0.example.net"),
            ("DB_NAME", "exif-app"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.environment, "prod");
        assert_eq!(config.store.username.as_deref(), Some("reader"));
        assert_eq!(config.store.password.as_deref(), Some("s3cret"));
        assert_eq!(config.store.host.as_deref(), Some("cluster0.example.net"));
        assert_eq!(config.store.app_name.as_deref(), Some("exif-app"));
    }

    #[test]
    fn test_apply_env_ignores_empty_values() {
        let mut config = Config::default();
        config.store.host = Some("from-file".into());
        config.apply_env(|k| (k == "DB_HOST").then(String::new));
        assert_eq!(config.store.host.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
bind = "127.0.0.1:8080"

[store]
scheme = "mongodb"
host = "localhost:27017"
collection = "exif"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.store.scheme, "mongodb");
        assert_eq!(config.store.collection, "exif");
        // Untouched sections keep defaults
        assert_eq!(config.store.database, "ir-exif");
        assert_eq!(config.fetch.timeout_ms, 10_000);
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/exifdb.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_to_toml_omits_password() {
        let mut config = Config::default();
        config.store.password = Some("hunter2".into());
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[store]"));
        assert!(!toml.contains("hunter2"));
    }

    #[test]
    fn test_store_debug_redacts_password() {
        let mut store = StoreConfig::default();
        store.password = Some("hunter2".into());
        let debug = format!("{:?}", store);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
