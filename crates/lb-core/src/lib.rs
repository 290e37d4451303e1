//! Banggoo LBaaS Core
//!
//! Domain types, error taxonomy, and the driver/host contracts

pub mod client;
pub mod driver;
pub mod error;
pub mod host;
pub mod types;

pub use client::{DeviceClient, DeviceError};
pub use driver::LoadBalancerDriver;
pub use error::{ConfigError, DriverError, HostError};
pub use types::*;

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;
