//! Logging Setup
//!
//! Installs a `tracing` subscriber. A non-empty, parseable `RUST_LOG`
//! replaces the configured level entirely; otherwise the configured level
//! applies.

use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber
///
/// Fails with [`Error::Configuration`] for an unknown level or when a
/// global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(config, env.as_deref())?;

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    };

    installed.map_err(|e| Error::Configuration(format!("logging already initialized: {}", e)))
}

/// Filter from `RUST_LOG` directives, falling back to the configured level
fn build_filter(config: &LoggingConfig, env: Option<&str>) -> Result<EnvFilter> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| Error::Configuration(format!("invalid log level: {}", config.level)))?;

    let from_env = env
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok());

    Ok(from_env.unwrap_or_else(|| EnvFilter::new(level.as_str().to_lowercase())))
}
