//! Domain Ports - Core trait definitions for config output
//!
//! These traits define the boundary between rendering and the place the
//! rendered bytes end up. Adapters in [`crate::sink`] implement them.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

// =============================================================================
// Config Sink Port
// =============================================================================

/// Port for writing a rendered configuration
///
/// A sink receives the whole buffer at once and replaces whatever it held
/// before. Implementations do not validate the contents.
pub trait ConfigSink: Send + Sync {
    /// Write the full buffer
    fn write(&self, bytes: &[u8]) -> Result<()>;

    /// Human readable destination, used in log lines
    fn describe(&self) -> String;
}

/// Async port for writing a rendered configuration
#[async_trait]
pub trait AsyncConfigSink: Send + Sync {
    /// Write the full buffer
    async fn write(&self, bytes: &[u8]) -> Result<()>;

    /// Human readable destination, used in log lines
    fn describe(&self) -> String;
}

// =============================================================================
// Type Aliases for Arc'd Traits
// =============================================================================

pub type ConfigSinkRef = Arc<dyn ConfigSink>;
pub type AsyncConfigSinkRef = Arc<dyn AsyncConfigSink>;
