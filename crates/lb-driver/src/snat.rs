//! SNAT port lifecycle
//!
//! The appliance needs one port per subnet for tenant-to-subnet address
//! translation. The port is shared by every pool on the subnet: created
//! lazily with the first pool, deleted when the last pool goes away.
//! Invariant: a SNAT port exists for a subnet iff at least one pool still
//! references that subnet. A per-subnet mutex is held across the
//! find/create and list/delete sequences so concurrent pool lifecycle
//! operations cannot double-create or prematurely delete the port.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::Mutex;

use banggoo_lb_core::error::DriverError;
use banggoo_lb_core::host::{CoreNetwork, LbHost};
use banggoo_lb_core::types::{
    FixedIpRequest, PoolFilter, Port, PortFilter, PortRequest, RequestContext,
};

use crate::DRIVER_NAME;

const SNAT_PORT_PREFIX: &str = "_lb-snatport-";

/// Device-id (and port name) for the subnet's SNAT port
pub fn snat_port_device_id(subnet_id: &str) -> String {
    format!("{}{}", SNAT_PORT_PREFIX, subnet_id)
}

/// Manages the shared per-subnet SNAT ports
pub struct SnatPortManager {
    host: Arc<dyn LbHost>,
    core: Arc<dyn CoreNetwork>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SnatPortManager {
    pub fn new(host: Arc<dyn LbHost>, core: Arc<dyn CoreNetwork>) -> Self {
        Self {
            host,
            core,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn subnet_lock(&self, subnet_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(subnet_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Look up the subnet's SNAT port, if one exists
    pub async fn find(
        &self,
        ctx: &RequestContext,
        tenant_id: &str,
        subnet_id: &str,
    ) -> Result<Option<Port>, DriverError> {
        let subnet = self.core.get_subnet(ctx, subnet_id).await?;
        let device_id = snat_port_device_id(subnet_id);
        debug!(
            "filtering ports on network_id={} tenant_id={} device_id={}",
            subnet.network_id, tenant_id, device_id
        );

        let filter = PortFilter {
            network_id: Some(subnet.network_id),
            tenant_id: Some(tenant_id.to_string()),
            device_id: Some(device_id),
            device_owner: Some(DRIVER_NAME.to_string()),
        };
        let ports = self.core.get_ports(ctx, &filter).await?;
        Ok(ports.into_iter().next())
    }

    /// Find-or-create the subnet's SNAT port
    ///
    /// Creation requests an admin-state-down port tagged with the derived
    /// device-id and this driver as owner, optionally pinned to
    /// `requested_ip`.
    pub async fn ensure(
        &self,
        ctx: &RequestContext,
        tenant_id: &str,
        subnet_id: &str,
        requested_ip: Option<IpAddr>,
    ) -> Result<Port, DriverError> {
        let lock = self.subnet_lock(subnet_id).await;
        let _guard = lock.lock().await;

        if let Some(port) = self.find(ctx, tenant_id, subnet_id).await? {
            info!("found an existing SNAT port for subnet {}", subnet_id);
            return Ok(port);
        }

        info!("no SNAT port found for subnet {}, creating one", subnet_id);
        let subnet = self.core.get_subnet(ctx, subnet_id).await?;
        let request = PortRequest {
            tenant_id: tenant_id.to_string(),
            name: snat_port_device_id(subnet_id),
            network_id: subnet.network_id,
            admin_state_up: false,
            device_id: snat_port_device_id(subnet_id),
            device_owner: DRIVER_NAME.to_string(),
            fixed_ip: FixedIpRequest {
                subnet_id: subnet.id,
                ip_address: requested_ip,
            },
        };
        let port = self.core.create_port(ctx, &request).await?;
        info!("created SNAT port {} on subnet {}", port.id, subnet_id);
        Ok(port)
    }

    /// Delete the subnet's SNAT port when no pool references the subnet
    pub async fn release_if_unused(
        &self,
        ctx: &RequestContext,
        tenant_id: &str,
        subnet_id: &str,
    ) -> Result<(), DriverError> {
        let lock = self.subnet_lock(subnet_id).await;
        let _guard = lock.lock().await;

        let filter = PoolFilter {
            subnet_id: Some(subnet_id.to_string()),
            tenant_id: Some(tenant_id.to_string()),
        };
        let pools = self.host.get_pools(ctx, &filter).await?;
        if !pools.is_empty() {
            return Ok(());
        }

        if let Some(port) = self.find(ctx, tenant_id, subnet_id).await? {
            self.core.delete_port(ctx, &port.id).await?;
            info!(
                "removed SNAT port {} for subnet {}, last pool is gone",
                port.id, subnet_id
            );
        }
        Ok(())
    }
}
