//! Device client contract
//!
//! The appliance speaks a tenant-scoped REST API. The driver addresses
//! resources either by collection (`vips`) for creation or by path
//! (`vips/<id>`, `pools/<id>/healthmonitors/<id>`) for everything else;
//! request bodies are JSON objects enveloped under the singular resource
//! name.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by a [`DeviceClient`]
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The request never got a well-formed answer from the appliance
    #[error("transport failure talking to device: {message}")]
    Transport { message: String },

    /// The appliance answered and said no; its own message is preserved
    #[error("device rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The addressed resource does not exist on the appliance
    #[error("no such resource on device: {path}")]
    NotFound { path: String },
}

impl DeviceError {
    /// Transport failures are the only variant worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeviceError::Transport { .. })
    }
}

/// Tenant-scoped REST client for the appliance
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// POST `payload` to `collection`, enveloped under `singular`
    async fn create_resource(
        &self,
        tenant_id: &str,
        collection: &str,
        singular: &str,
        payload: Value,
    ) -> Result<(), DeviceError>;

    /// PUT `payload` to `resource_path`, enveloped under `singular`
    async fn update_resource(
        &self,
        tenant_id: &str,
        resource_path: &str,
        singular: &str,
        payload: Value,
    ) -> Result<(), DeviceError>;

    /// DELETE `resource_path`
    async fn remove_resource(&self, tenant_id: &str, resource_path: &str)
        -> Result<(), DeviceError>;

    /// GET `resource_path`, returning the parsed response body
    async fn retrieve_resource(
        &self,
        tenant_id: &str,
        resource_path: &str,
    ) -> Result<Value, DeviceError>;
}
