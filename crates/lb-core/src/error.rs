//! Error types for driver operations

use thiserror::Error;

use crate::client::DeviceError;

/// Top-level error for driver lifecycle operations
///
/// Call sites can distinguish a device-side failure (and within it,
/// transport vs. rejection vs. not-found) from configuration and host
/// persistence problems.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration resolution errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required option: {field}")]
    Missing { field: String },

    #[error("invalid value for {field}: {value}")]
    Invalid { field: String, value: String },

    #[error("failed to read {path}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Failures reported by the host persistence/status API
#[derive(Debug, Error)]
pub enum HostError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("host storage error: {message}")]
    Storage { message: String },
}
