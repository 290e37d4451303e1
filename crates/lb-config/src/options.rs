//! Driver connection options
//!
//! An explicit struct constructed once and handed to the adapter; there is
//! no process-global option registry. Host-supplied values take precedence
//! over the defaults file.

use anyhow::{bail, Result};
use indexmap::IndexMap;

use banggoo_lb_core::error::ConfigError;

pub const ADC_ADDRESS_OPT: &str = "adc_address";
pub const ADC_USER_OPT: &str = "adc_user";
pub const ADC_PASSWORD_OPT: &str = "adc_password";

/// Resolved connection parameters for the appliance
#[derive(Clone)]
pub struct DriverOptions {
    pub address: String,
    pub username: String,
    pub password: String,
}

// Credentials must never end up in logs, so Debug is hand-written.
impl std::fmt::Debug for DriverOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverOptions")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Host-supplied typed overrides; `None` falls back to the defaults file
#[derive(Debug, Clone, Default)]
pub struct DriverOptionOverrides {
    pub address: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl DriverOptions {
    /// Resolve options from overrides and file defaults
    ///
    /// All three parameters must resolve to a value; an unreachable
    /// appliance address is better caught here than at request time.
    pub fn resolve(
        overrides: DriverOptionOverrides,
        defaults: &IndexMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let resolve_field = |override_value: Option<String>, key: &str| {
            override_value
                .or_else(|| defaults.get(key).cloned())
                .ok_or_else(|| ConfigError::Missing {
                    field: key.to_string(),
                })
        };

        Ok(Self {
            address: resolve_field(overrides.address, ADC_ADDRESS_OPT)?,
            username: resolve_field(overrides.username, ADC_USER_OPT)?,
            password: resolve_field(overrides.password, ADC_PASSWORD_OPT)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.address.is_empty() {
            bail!("appliance address cannot be empty");
        }
        if self.username.is_empty() {
            bail!("appliance username cannot be empty");
        }
        if self.password.is_empty() {
            bail!("appliance password cannot be empty");
        }
        Ok(())
    }
}
