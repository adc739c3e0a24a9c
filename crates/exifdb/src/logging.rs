//! Logging setup for the `exifdb` binary.
//!
//! Events go to stderr, either human-readable or as one JSON object per line.
//! `RUST_LOG` replaces the computed filter entirely when set.

use exifdb_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Resolve the format from config; `--json-logs` always wins.
    fn resolve(config: &Config, json_override: bool) -> Self {
        if json_override || config.logging.format == "json" {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Filter directives for `level`.
///
/// The service crates and request spans follow `level`. Everything else,
/// including the store driver, stays at `warn`.
fn directives(level: &str) -> String {
    format!("warn,exifdb={level},exifdb_core={level},tower_http={level}")
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives(level)))
        .unwrap_or_else(|_| EnvFilter::new(directives("info")))
}

/// Install the global subscriber.
pub fn init(level: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(filter(level));

    match format {
        // Keep the request span on each line so log shippers can group by it
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Initialize logging from the loaded configuration, with CLI overrides.
pub fn init_from_config(config: &Config, verbose: bool, json_logs: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    init(level, LogFormat::resolve(config, json_logs));
}
