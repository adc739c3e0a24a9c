//! The `exifdb config` command.
//!
//! Every subcommand works on the file passed with `--config`, or the
//! platform default when none is given.

use anyhow::Context;
use clap::{Args, Subcommand};
use exifdb_core::{Config, MongoConnector};
use std::path::{Path, PathBuf};

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration (file + environment, password omitted)
    Show,

    /// Print the config file location and whether it exists
    Path,

    /// Load the config file and report whether the store settings are complete
    Check,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn execute(args: ConfigArgs, config: Config, path: Option<&Path>) -> anyhow::Result<()> {
    let target = target_path(path);

    match args.command {
        ConfigCommand::Show => {
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            let state = if target.exists() { "exists" } else { "missing" };
            println!("{} ({state})", target.display());
        }

        ConfigCommand::Check => {
            for line in check(path)? {
                println!("{line}");
            }
        }

        ConfigCommand::Init { force } => {
            if target.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    target.display()
                );
            }
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(&target, Config::default().to_toml()?)
                .with_context(|| format!("failed to write {}", target.display()))?;

            tracing::info!(path = %target.display(), "Wrote default config");
            println!("Configuration initialized at: {}", target.display());
        }
    }

    Ok(())
}

fn target_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(Config::default_path)
}

/// Reload the configuration strictly and describe it.
///
/// A file that fails to parse or validate is an error. Missing store
/// settings are reported but do not fail the check, since they only matter
/// once a request reaches the store.
fn check(path: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let config = Config::load(path)
        .with_context(|| format!("{} is not valid", target_path(path).display()))?;

    let mut report = vec![format!("OK: {}", target_path(path).display())];
    match MongoConnector::new(config.store).connection_uri() {
        Ok(_) => report.push("Store settings complete".to_string()),
        Err(e) => report.push(format!("Store not usable yet: {e}")),
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_path_prefers_explicit() {
        let explicit = Path::new("/tmp/exifdb-test.toml");
        assert_eq!(target_path(Some(explicit)), explicit);
        assert_eq!(target_path(None), Config::default_path());
    }

    #[test]
    fn test_check_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fetch]\ntimeout_ms = 0\n").unwrap();

        let err = check(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("is not valid"));
    }

    #[test]
    fn test_check_accepts_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbind = \"127.0.0.1:5001\"\n").unwrap();

        let report = check(Some(&path)).unwrap();
        assert!(report[0].starts_with("OK: "));
        assert_eq!(report.len(), 2);
    }

    #[tokio::test]
    async fn test_init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let args = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };

        execute(args, Config::default(), Some(&path)).await.unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.store.database, "ir-exif");

        let again = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };
        assert!(execute(again, Config::default(), Some(&path)).await.is_err());
    }
}
