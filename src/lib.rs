//! DRBD Resource Config
//!
//! Builds validated DRBD resource descriptors and renders them to the text
//! format read by drbd-utils, with a deterministic allocator for the ports,
//! device minors and node-ids the descriptors need.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐   get()   ┌───────────────────────────────┐
//! │    NumberPool     │──────────▶│           Resource            │
//! │ (ports / minors / │           │  hosts ─┬─ volumes (per host) │
//! │    node-ids)      │           │         └─ one mutex          │
//! └───────────────────┘           └───────────────┬───────────────┘
//!           ▲                                     │ snapshot()
//!           │ ranges                              ▼
//! ┌───────────────────┐           ┌───────────────────────────────┐
//! │  GeneratorConfig  │           │        ConfigRenderer         │
//! │   (YAML / JSON)   │           └───────────────┬───────────────┘
//! └───────────────────┘                           │ bytes
//!                                                 ▼
//!                                 ┌───────────────────────────────┐
//!                                 │  ConfigSink / AsyncConfigSink │
//!                                 │    (FileSink, MemorySink)     │
//!                                 └───────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use drbd_resource_config::{GeneratorConfig, Resource};
//!
//! # fn main() -> drbd_resource_config::Result<()> {
//! let config = GeneratorConfig::default();
//! let ports = config.port_pool(Vec::new());
//! let minors = config.minor_pool(Vec::new());
//!
//! let port = u16::try_from(ports.get()?).expect("port range fits in u16");
//! let resource = Resource::new("r0", port);
//! resource.add_host(0, "alpha", "10.0.0.1")?;
//! resource.add_host(1, "beta", "10.0.0.2")?;
//!
//! let minor = minors.get()?;
//! resource.add_volume(0, minor, "/dev/vg0/r0", "alpha")?;
//! resource.add_volume(0, minor, "/dev/vg0/r0", "beta")?;
//!
//! resource.write_config(&config.file_sink("/etc/drbd.d/r0.res"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`allocation`]: Free number allocation and pools
//! - [`resource`]: Host/volume registry and snapshots
//! - [`render`]: Configuration text rendering
//! - [`sink`]: Output adapters
//! - [`domain`]: Sink port traits
//! - [`config`]: Generator configuration
//! - [`telemetry`]: Logging setup
//! - [`error`]: Error types and handling

pub mod allocation;
pub mod config;
pub mod domain;
pub mod error;
pub mod render;
pub mod resource;
pub mod sink;
pub mod telemetry;

// Re-export commonly used types
pub use allocation::{allocate, NumberPool, PoolStats};

pub use config::{GeneratorConfig, LoggingConfig, NumberRange, OutputConfig};

pub use domain::ports::{AsyncConfigSink, ConfigSink};

pub use error::{Error, ErrorAction, ErrorKind, HostField, Result, VolumeField};

pub use render::ConfigRenderer;

pub use resource::{HostSpec, Resource, ResourceSnapshot, VolumeSpec};

pub use sink::{FileSink, MemorySink};

pub use telemetry::init_logging;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
