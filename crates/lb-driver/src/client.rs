//! vDirect REST client
//!
//! One pooled client per adapter instance, created at construction and
//! reused for the adapter's lifetime. Timeouts and connection pooling live
//! here; the driver above only sees [`DeviceError`] variants.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};

use banggoo_lb_config::DriverOptions;
use banggoo_lb_core::client::{DeviceClient, DeviceError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the Banggoo vDirect appliance
pub struct VdirectClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl VdirectClient {
    /// Build a client from resolved driver options
    pub fn new(options: &DriverOptions) -> Result<Self> {
        options.validate()?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: format!("http://{}/api/v1", options.address),
            username: options.username.clone(),
            password: options.password.clone(),
        })
    }

    /// Build the tenant-scoped URL for `resource_path`
    ///
    /// Every `/`-separated segment is percent-encoded; ids come from
    /// callers and must not be able to splice path components.
    fn url(&self, tenant_id: &str, resource_path: &str) -> String {
        let encoded: Vec<String> = resource_path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!(
            "{}/tenants/{}/loadbalancer/{}",
            self.base_url,
            urlencoding::encode(tenant_id),
            encoded.join("/")
        )
    }

    async fn send(
        &self,
        method: Method,
        tenant_id: &str,
        resource_path: &str,
        body: Option<Value>,
    ) -> Result<Value, DeviceError> {
        let url = self.url(tenant_id, resource_path);
        log::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|err| DeviceError::Transport {
            message: err.to_string(),
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DeviceError::NotFound {
                path: resource_path.to_string(),
            });
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DeviceError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await.map_err(|err| DeviceError::Transport {
            message: err.to_string(),
        })?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| DeviceError::Transport {
            message: format!("malformed response body: {}", err),
        })
    }
}

/// Wrap `payload` under the singular resource name, as the appliance expects
fn envelope(singular: &str, payload: Value) -> Value {
    json!({ singular: payload })
}

#[async_trait]
impl DeviceClient for VdirectClient {
    async fn create_resource(
        &self,
        tenant_id: &str,
        collection: &str,
        singular: &str,
        payload: Value,
    ) -> Result<(), DeviceError> {
        self.send(
            Method::POST,
            tenant_id,
            collection,
            Some(envelope(singular, payload)),
        )
        .await?;
        Ok(())
    }

    async fn update_resource(
        &self,
        tenant_id: &str,
        resource_path: &str,
        singular: &str,
        payload: Value,
    ) -> Result<(), DeviceError> {
        self.send(
            Method::PUT,
            tenant_id,
            resource_path,
            Some(envelope(singular, payload)),
        )
        .await?;
        Ok(())
    }

    async fn remove_resource(
        &self,
        tenant_id: &str,
        resource_path: &str,
    ) -> Result<(), DeviceError> {
        self.send(Method::DELETE, tenant_id, resource_path, None)
            .await?;
        Ok(())
    }

    async fn retrieve_resource(
        &self,
        tenant_id: &str,
        resource_path: &str,
    ) -> Result<Value, DeviceError> {
        self.send(Method::GET, tenant_id, resource_path, None).await
    }
}
