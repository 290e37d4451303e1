//! Banggoo load-balancer driver
//!
//! Each lifecycle operation follows the same shape: build the typed payload,
//! call the appliance, reflect the outcome into the host's status field.
//! Success moves the object from PENDING to ACTIVE; a device failure either
//! rolls the local record back (creates) or parks it in ERROR (updates and
//! deletes). Failure-path status writes are best-effort: the device error is
//! what the caller needs to see, not a secondary storage hiccup.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::to_value;

use banggoo_lb_config::DriverOptions;
use banggoo_lb_core::client::{DeviceClient, DeviceError};
use banggoo_lb_core::driver::LoadBalancerDriver;
use banggoo_lb_core::error::DriverError;
use banggoo_lb_core::host::{CoreNetwork, LbHost};
use banggoo_lb_core::types::{
    EntityKind, HealthMonitor, Member, ObjectStatus, Pool, PoolStats, RequestContext, Vip,
};

use crate::client::VdirectClient;
use crate::payloads::{
    HealthMonitorCreate, HealthMonitorUpdate, MemberCreate, MemberUpdate, NetworkInfo, PoolCreate,
    PoolUpdate, VipCreate, VipUpdate,
};
use crate::snat::SnatPortManager;

const VIPS_RESOURCE: &str = "vips";
const VIP_RESOURCE: &str = "vip";
const POOLS_RESOURCE: &str = "pools";
const POOL_RESOURCE: &str = "pool";
const MEMBERS_RESOURCE: &str = "members";
const MEMBER_RESOURCE: &str = "member";
const MONITORS_RESOURCE: &str = "healthmonitors";
const MONITOR_RESOURCE: &str = "healthmonitor";
const STATS_RESOURCE: &str = "statistics";

/// Driver adapter for the Banggoo vDirect appliance
pub struct BanggooDriver {
    client: Arc<dyn DeviceClient>,
    host: Arc<dyn LbHost>,
    core: Arc<dyn CoreNetwork>,
    snat: SnatPortManager,
}

impl BanggooDriver {
    pub fn new(
        client: Arc<dyn DeviceClient>,
        host: Arc<dyn LbHost>,
        core: Arc<dyn CoreNetwork>,
    ) -> Self {
        let snat = SnatPortManager::new(host.clone(), core.clone());
        Self {
            client,
            host,
            core,
            snat,
        }
    }

    /// Construct the driver with a real vDirect client
    pub fn from_options(
        options: &DriverOptions,
        host: Arc<dyn LbHost>,
        core: Arc<dyn CoreNetwork>,
    ) -> anyhow::Result<Self> {
        info!("connecting to vDirect appliance at {}", options.address);
        let client = Arc::new(VdirectClient::new(options)?);
        Ok(Self::new(client, host, core))
    }

    /// Placement attributes for an entity living on `subnet_id`
    async fn network_info(
        &self,
        ctx: &RequestContext,
        subnet_id: &str,
    ) -> Result<NetworkInfo, DriverError> {
        let subnet = self.core.get_subnet(ctx, subnet_id).await?;
        let network = self.core.get_network(ctx, &subnet.network_id).await?;
        Ok(NetworkInfo {
            network_id: network.id,
            subnet_id: subnet.id,
            network_type: network.network_type,
            segmentation_id: network.segmentation_id,
            port_id: None,
            snat_ip: None,
        })
    }

    async fn mark_status(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        id: &str,
        status: ObjectStatus,
    ) {
        if let Err(err) = self.host.update_status(ctx, kind, id, status).await {
            warn!("failed to persist {} status for {} {}: {}", status, kind, id, err);
        }
    }

    async fn mark_monitor_association(
        &self,
        ctx: &RequestContext,
        monitor_id: &str,
        pool_id: &str,
        status: ObjectStatus,
        message: &str,
    ) {
        if let Err(err) = self
            .host
            .update_pool_health_monitor(ctx, monitor_id, pool_id, status, message)
            .await
        {
            warn!(
                "failed to persist monitor {} status on pool {}: {}",
                monitor_id, pool_id, err
            );
        }
    }
}

#[async_trait]
impl LoadBalancerDriver for BanggooDriver {
    /// Create a VIP on the appliance
    async fn create_vip(&self, ctx: &RequestContext, vip: &Vip) -> Result<(), DriverError> {
        let mut network = self.network_info(ctx, &vip.subnet_id).await?;
        network.port_id = Some(vip.port_id.clone());

        let payload = VipCreate::new(vip, network);
        debug!("vip creation: {:?}", payload);

        if let Err(err) = self
            .client
            .create_resource(&ctx.tenant_id, VIPS_RESOURCE, VIP_RESOURCE, to_value(&payload)?)
            .await
        {
            if let Err(host_err) = self.host.delete_vip(ctx, &vip.id).await {
                warn!(
                    "failed to remove local vip {} after device failure: {}",
                    vip.id, host_err
                );
            }
            return Err(err.into());
        }

        self.host
            .update_status(ctx, EntityKind::Vip, &vip.id, ObjectStatus::Active)
            .await?;
        Ok(())
    }

    /// Update a VIP on the appliance
    async fn update_vip(
        &self,
        ctx: &RequestContext,
        old_vip: &Vip,
        vip: &Vip,
    ) -> Result<(), DriverError> {
        let payload = VipUpdate::from_vip(vip);
        let resource_path = format!("{}/{}", VIPS_RESOURCE, vip.id);
        debug!("vip {} update: {:?}", vip.id, payload);

        if let Err(err) = self
            .client
            .update_resource(&ctx.tenant_id, &resource_path, VIP_RESOURCE, to_value(&payload)?)
            .await
        {
            self.mark_status(ctx, EntityKind::Vip, &old_vip.id, ObjectStatus::Error)
                .await;
            return Err(err.into());
        }

        self.host
            .update_status(ctx, EntityKind::Vip, &old_vip.id, ObjectStatus::Active)
            .await?;
        Ok(())
    }

    /// Delete a VIP; a device-side 404 counts as already deleted
    async fn delete_vip(&self, ctx: &RequestContext, vip: &Vip) -> Result<(), DriverError> {
        let resource_path = format!("{}/{}", VIPS_RESOURCE, vip.id);
        debug!("vip removal: {}", vip.id);

        match self.client.remove_resource(&ctx.tenant_id, &resource_path).await {
            Ok(()) => {}
            Err(DeviceError::NotFound { .. }) => {
                debug!("vip {} already absent on device", vip.id);
            }
            Err(err) => {
                self.mark_status(ctx, EntityKind::Vip, &vip.id, ObjectStatus::Error)
                    .await;
                return Err(err.into());
            }
        }

        self.host.delete_vip(ctx, &vip.id).await?;
        Ok(())
    }

    /// Create a pool, allocating the subnet's SNAT port if needed
    async fn create_pool(&self, ctx: &RequestContext, pool: &Pool) -> Result<(), DriverError> {
        let mut network = self.network_info(ctx, &pool.subnet_id).await?;
        let snat_port = self
            .snat
            .ensure(ctx, &pool.tenant_id, &pool.subnet_id, None)
            .await?;
        network.port_id = Some(snat_port.id.clone());
        network.snat_ip = snat_port.fixed_ips.first().map(|fixed| fixed.ip_address);

        let payload = PoolCreate::new(pool, network);
        debug!("pool creation: {:?}", payload);

        if let Err(err) = self
            .client
            .create_resource(&ctx.tenant_id, POOLS_RESOURCE, POOL_RESOURCE, to_value(&payload)?)
            .await
        {
            if let Err(host_err) = self.host.delete_pool(ctx, &pool.id).await {
                warn!(
                    "failed to remove local pool {} after device failure: {}",
                    pool.id, host_err
                );
            }
            return Err(err.into());
        }

        self.host
            .update_status(ctx, EntityKind::Pool, &pool.id, ObjectStatus::Active)
            .await?;
        Ok(())
    }

    /// Update a pool on the appliance
    async fn update_pool(
        &self,
        ctx: &RequestContext,
        old_pool: &Pool,
        pool: &Pool,
    ) -> Result<(), DriverError> {
        let payload = PoolUpdate::from_pool(pool);
        let resource_path = format!("{}/{}", POOLS_RESOURCE, old_pool.id);
        debug!("pool {} update: {:?}", old_pool.id, payload);

        if let Err(err) = self
            .client
            .update_resource(&ctx.tenant_id, &resource_path, POOL_RESOURCE, to_value(&payload)?)
            .await
        {
            self.mark_status(ctx, EntityKind::Pool, &old_pool.id, ObjectStatus::Error)
                .await;
            return Err(err.into());
        }

        self.host
            .update_status(ctx, EntityKind::Pool, &old_pool.id, ObjectStatus::Active)
            .await?;
        Ok(())
    }

    /// Delete a pool and release the subnet's SNAT port if it was the last
    async fn delete_pool(&self, ctx: &RequestContext, pool: &Pool) -> Result<(), DriverError> {
        let resource_path = format!("{}/{}", POOLS_RESOURCE, pool.id);
        debug!("pool removal: {}", pool.id);

        match self.client.remove_resource(&ctx.tenant_id, &resource_path).await {
            Ok(()) => {}
            Err(DeviceError::NotFound { .. }) => {
                debug!("pool {} already absent on device", pool.id);
            }
            Err(err) => {
                self.mark_status(ctx, EntityKind::Pool, &pool.id, ObjectStatus::Error)
                    .await;
                return Err(err.into());
            }
        }

        self.host.delete_pool(ctx, &pool.id).await?;
        self.snat
            .release_if_unused(ctx, &pool.tenant_id, &pool.subnet_id)
            .await?;
        Ok(())
    }

    /// Create a pool member on the appliance
    async fn create_member(
        &self,
        ctx: &RequestContext,
        member: &Member,
    ) -> Result<(), DriverError> {
        let payload = MemberCreate::new(member);
        debug!("member creation: {:?}", payload);

        if let Err(err) = self
            .client
            .create_resource(
                &ctx.tenant_id,
                MEMBERS_RESOURCE,
                MEMBER_RESOURCE,
                to_value(&payload)?,
            )
            .await
        {
            if let Err(host_err) = self.host.delete_member(ctx, &member.id).await {
                warn!(
                    "failed to remove local member {} after device failure: {}",
                    member.id, host_err
                );
            }
            return Err(err.into());
        }

        self.host
            .update_status(ctx, EntityKind::Member, &member.id, ObjectStatus::Active)
            .await?;
        Ok(())
    }

    async fn update_member(
        &self,
        ctx: &RequestContext,
        old_member: &Member,
        member: &Member,
    ) -> Result<(), DriverError> {
        let payload = MemberUpdate::from_member(member);
        let resource_path = format!("{}/{}", MEMBERS_RESOURCE, old_member.id);
        debug!("member {} update: {:?}", old_member.id, payload);

        if let Err(err) = self
            .client
            .update_resource(
                &ctx.tenant_id,
                &resource_path,
                MEMBER_RESOURCE,
                to_value(&payload)?,
            )
            .await
        {
            self.mark_status(ctx, EntityKind::Member, &old_member.id, ObjectStatus::Error)
                .await;
            return Err(err.into());
        }

        self.host
            .update_status(ctx, EntityKind::Member, &old_member.id, ObjectStatus::Active)
            .await?;
        Ok(())
    }

    async fn delete_member(
        &self,
        ctx: &RequestContext,
        member: &Member,
    ) -> Result<(), DriverError> {
        let resource_path = format!("{}/{}", MEMBERS_RESOURCE, member.id);
        debug!("member removal: {}", member.id);

        match self.client.remove_resource(&ctx.tenant_id, &resource_path).await {
            Ok(()) => {}
            Err(DeviceError::NotFound { .. }) => {
                debug!("member {} already absent on device", member.id);
            }
            Err(err) => {
                self.mark_status(ctx, EntityKind::Member, &member.id, ObjectStatus::Error)
                    .await;
                return Err(err.into());
            }
        }

        self.host.delete_member(ctx, &member.id).await?;
        Ok(())
    }

    /// Attach a health monitor to a pool on the appliance
    ///
    /// Monitor status lives on the pool association, so outcomes are
    /// reported through the association update rather than a direct object
    /// status.
    async fn create_pool_health_monitor(
        &self,
        ctx: &RequestContext,
        monitor: &HealthMonitor,
        pool_id: &str,
    ) -> Result<(), DriverError> {
        let payload = HealthMonitorCreate::new(monitor);
        let resource_path = format!("{}/{}/{}", POOLS_RESOURCE, pool_id, MONITORS_RESOURCE);
        debug!("healthmonitor creation for pool {}: {:?}", pool_id, payload);

        if let Err(err) = self
            .client
            .create_resource(
                &ctx.tenant_id,
                &resource_path,
                MONITOR_RESOURCE,
                to_value(&payload)?,
            )
            .await
        {
            if let Err(host_err) = self
                .host
                .delete_pool_health_monitor(ctx, &monitor.id, pool_id)
                .await
            {
                warn!(
                    "failed to remove local monitor {} after device failure: {}",
                    monitor.id, host_err
                );
            }
            return Err(err.into());
        }

        self.host
            .update_pool_health_monitor(ctx, &monitor.id, pool_id, ObjectStatus::Active, "")
            .await?;
        Ok(())
    }

    async fn update_pool_health_monitor(
        &self,
        ctx: &RequestContext,
        old_monitor: &HealthMonitor,
        monitor: &HealthMonitor,
        pool_id: &str,
    ) -> Result<(), DriverError> {
        let payload = HealthMonitorUpdate::from_monitor(monitor);
        let resource_path = format!("{}/{}", MONITORS_RESOURCE, old_monitor.id);
        debug!("healthmonitor {} update: {:?}", old_monitor.id, payload);

        if let Err(err) = self
            .client
            .update_resource(
                &ctx.tenant_id,
                &resource_path,
                MONITOR_RESOURCE,
                to_value(&payload)?,
            )
            .await
        {
            self.mark_monitor_association(
                ctx,
                &old_monitor.id,
                pool_id,
                ObjectStatus::Error,
                &err.to_string(),
            )
            .await;
            return Err(err.into());
        }

        self.host
            .update_pool_health_monitor(ctx, &old_monitor.id, pool_id, ObjectStatus::Active, "")
            .await?;
        Ok(())
    }

    async fn delete_pool_health_monitor(
        &self,
        ctx: &RequestContext,
        monitor: &HealthMonitor,
        pool_id: &str,
    ) -> Result<(), DriverError> {
        let resource_path = format!(
            "{}/{}/{}/{}",
            POOLS_RESOURCE, pool_id, MONITORS_RESOURCE, monitor.id
        );
        debug!("healthmonitor {} removal for pool {}", monitor.id, pool_id);

        match self.client.remove_resource(&ctx.tenant_id, &resource_path).await {
            Ok(()) => {}
            Err(DeviceError::NotFound { .. }) => {
                debug!("monitor {} already absent on device", monitor.id);
            }
            Err(err) => {
                self.mark_monitor_association(
                    ctx,
                    &monitor.id,
                    pool_id,
                    ObjectStatus::Error,
                    &err.to_string(),
                )
                .await;
                return Err(err.into());
            }
        }

        self.host
            .delete_pool_health_monitor(ctx, &monitor.id, pool_id)
            .await?;
        Ok(())
    }

    /// Retrieve pool traffic counters from the appliance
    ///
    /// A device failure marks the pool ERROR and propagates; callers can
    /// tell a failed retrieval from an idle pool.
    async fn stats(&self, ctx: &RequestContext, pool_id: &str) -> Result<PoolStats, DriverError> {
        let resource_path = format!("{}/{}", STATS_RESOURCE, pool_id);
        debug!("pool stats retrieval: {}", pool_id);

        let body = match self.client.retrieve_resource(&ctx.tenant_id, &resource_path).await {
            Ok(body) => body,
            Err(err) => {
                self.mark_status(ctx, EntityKind::Pool, pool_id, ObjectStatus::Error)
                    .await;
                return Err(err.into());
            }
        };

        let stats = serde_json::from_value(body)?;
        Ok(stats)
    }
}
