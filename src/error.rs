//! Error types for DRBD resource generation
//!
//! Provides structured error types for number allocation, the resource
//! model, configuration loading, and configuration sinks.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Conflicting Fields
// =============================================================================

/// Host field that collided with an existing host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostField {
    NodeId,
    Name,
    Address,
}

impl std::fmt::Display for HostField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostField::NodeId => write!(f, "node-id"),
            HostField::Name => write!(f, "name"),
            HostField::Address => write!(f, "address"),
        }
    }
}

/// Volume field that collided with an existing volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeField {
    Id,
    BackingDevice,
    Minor,
}

impl std::fmt::Display for VolumeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumeField::Id => write!(f, "id"),
            VolumeField::BackingDevice => write!(f, "backing device"),
            VolumeField::Minor => write!(f, "minor"),
        }
    }
}

// =============================================================================
// Error
// =============================================================================

/// Unified error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Allocation Errors
    // =========================================================================
    #[error("Invalid number range: min {min}, max {max}")]
    InvalidRange { min: u32, max: u32 },

    #[error("Number {value} outside of range [{min}, {max}]")]
    OutOfRange { value: u32, min: u32, max: u32 },

    #[error("Could not find a free number in [{min}, {max}]")]
    Exhausted { min: u32, max: u32 },

    // =========================================================================
    // Resource Model Errors
    // =========================================================================
    #[error("Resource '{resource}' already contains host with {field}: '{value}'")]
    DuplicateHost {
        resource: String,
        field: HostField,
        value: String,
    },

    #[error("Host '{host}' already has a volume with {field}: '{value}'")]
    DuplicateVolume {
        host: String,
        field: VolumeField,
        value: String,
    },

    #[error("Resource '{resource}' has no host named '{hostname}'")]
    HostNotFound { resource: String, hostname: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to write config to {}: {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRange,
    Exhausted,
    DuplicateHost,
    DuplicateVolume,
    HostNotFound,
    Configuration,
    IoFailure,
}

/// What a caller can sensibly do about an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// The operation may succeed if repeated unchanged
    Retry,
    /// The inputs must change before retrying
    AdjustInput,
    /// Nothing left to try with this instance
    Abort,
}

impl Error {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidRange { .. } | Error::OutOfRange { .. } => ErrorKind::InvalidRange,
            Error::Exhausted { .. } => ErrorKind::Exhausted,
            Error::DuplicateHost { .. } => ErrorKind::DuplicateHost,
            Error::DuplicateVolume { .. } => ErrorKind::DuplicateVolume,
            Error::HostNotFound { .. } => ErrorKind::HostNotFound,
            Error::Configuration(_) | Error::YamlParse(_) | Error::JsonParse(_) => {
                ErrorKind::Configuration
            }
            Error::Sink { .. } | Error::Io(_) => ErrorKind::IoFailure,
        }
    }

    /// Determine what action to take for this error
    pub fn action(&self) -> ErrorAction {
        match self.kind() {
            ErrorKind::IoFailure => ErrorAction::Retry,

            // A pool never frees numbers on its own
            ErrorKind::Exhausted => ErrorAction::Abort,

            ErrorKind::InvalidRange
            | ErrorKind::DuplicateHost
            | ErrorKind::DuplicateVolume
            | ErrorKind::HostNotFound
            | ErrorKind::Configuration => ErrorAction::AdjustInput,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self.action(), ErrorAction::Retry)
    }
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;
