//! Banggoo LBaaS Config
//!
//! Defaults-file parsing and driver option resolution

pub mod defaults;
pub mod options;

pub use defaults::{parse_defaults, parse_defaults_file, DEFAULT_DEFAULTS_PATH};
pub use options::{DriverOptionOverrides, DriverOptions};
