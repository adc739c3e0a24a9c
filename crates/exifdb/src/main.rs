//! exifdb - store EXIF metadata from image URLs as documents.
//!
//! # Usage
//!
//! ```bash
//! # Run the API (store credentials from the environment)
//! DB_USERNAME=... DB_PASSWORD=... DB_HOST=cluster0.example.net DB_NAME=exif exifdb serve
//!
//! # View configuration
//! exifdb config show
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use exifdb_core::Config;
use std::path::PathBuf;

mod cli;
mod logging;

/// exifdb - EXIF metadata extraction and storage service.
#[derive(Parser, Debug)]
#[command(name = "exifdb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "EXIFDB_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::info!("exifdb v{}", exifdb_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Config(args) => {
            cli::config::execute(args, config, cli.config.as_deref()).await
        }
    }
}

/// Load configuration for `cli`.
///
/// `serve` refuses to start on a bad config file. The `config` commands fall
/// back to defaults so a broken file can still be located and rewritten.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match Config::load(cli.config.as_deref()) {
        Ok(config) => Ok(config),
        Err(e) if matches!(cli.command, Commands::Config(_)) => {
            // Logging is not initialized yet
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check the file with `exifdb config check`."
            );
            Ok(Config::default())
        }
        Err(e) => Err(e).context("failed to load configuration"),
    }
}
