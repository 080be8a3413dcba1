//! Generator Configuration
//!
//! Number ranges, output and logging settings, loadable from YAML or JSON.
//!
//! ```yaml
//! ports:    { min: 7000, max: 7999 }
//! minors:   { min: 1000, max: 49999 }
//! node_ids: { min: 0,    max: 31 }
//! output:   { file_mode: 420 }
//! logging:  { level: info, json: false }
//! ```

use crate::allocation::NumberPool;
use crate::error::{Error, Result};
use crate::sink::{FileSink, DEFAULT_FILE_MODE};
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// Number Range
// =============================================================================

/// Inclusive range a pool draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: u32,
    pub max: u32,
}

impl NumberRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Build a pool over this range seeded with `used`
    pub fn pool(&self, used: impl IntoIterator<Item = u32>) -> NumberPool {
        NumberPool::new(self.min, self.max, used)
    }

    fn validate(&self, what: &str) -> Result<()> {
        if self.max <= self.min {
            return Err(Error::Configuration(format!(
                "{} range is empty or inverted: [{}, {}]",
                what, self.min, self.max
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Output / Logging
// =============================================================================

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Unix mode applied to written config files
    pub file_mode: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output logs as JSON
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// =============================================================================
// Generator Configuration
// =============================================================================

/// Configuration for building resources and writing their configs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// TCP ports for resources
    pub ports: NumberRange,
    /// Device minors for volumes
    pub minors: NumberRange,
    /// DRBD node-ids for hosts
    pub node_ids: NumberRange,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ports: NumberRange::new(7000, 7999),
            minors: NumberRange::new(1000, 49999),
            // DRBD 9 supports up to 32 peers
            node_ids: NumberRange::new(0, 31),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_yaml_str(&contents),
        }
    }

    /// Check ranges, file mode and log level
    pub fn validate(&self) -> Result<()> {
        self.ports.validate("port")?;
        self.minors.validate("minor")?;
        self.node_ids.validate("node-id")?;

        if self.ports.max > u32::from(u16::MAX) {
            return Err(Error::Configuration(format!(
                "port range exceeds {}: max {}",
                u16::MAX,
                self.ports.max
            )));
        }

        if self.output.file_mode > 0o7777 {
            return Err(Error::Configuration(format!(
                "invalid file mode: {:o}",
                self.output.file_mode
            )));
        }

        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| {
                Error::Configuration(format!("invalid log level: {}", self.logging.level))
            })?;

        Ok(())
    }

    /// Pool of TCP ports
    pub fn port_pool(&self, used: impl IntoIterator<Item = u32>) -> NumberPool {
        self.ports.pool(used)
    }

    /// Pool of device minors
    pub fn minor_pool(&self, used: impl IntoIterator<Item = u32>) -> NumberPool {
        self.minors.pool(used)
    }

    /// Pool of node-ids
    pub fn node_id_pool(&self, used: impl IntoIterator<Item = u32>) -> NumberPool {
        self.node_ids.pool(used)
    }

    /// File sink using the configured mode
    pub fn file_sink(&self, path: impl AsRef<Path>) -> FileSink {
        FileSink::with_mode(path, self.output.file_mode)
    }
}
