//! Host framework contracts consumed by the driver
//!
//! The host owns the database; the driver only reflects appliance outcomes
//! into it through [`LbHost`] and queries network placement through
//! [`CoreNetwork`].

use async_trait::async_trait;

use crate::error::HostError;
use crate::types::{
    EntityKind, Network, ObjectStatus, Pool, PoolFilter, Port, PortFilter, PortRequest,
    RequestContext, Subnet,
};

/// Persistence and status API of the load-balancer host plugin
#[async_trait]
pub trait LbHost: Send + Sync {
    /// Persist a direct object status (VIP, pool, member)
    async fn update_status(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        id: &str,
        status: ObjectStatus,
    ) -> Result<(), HostError>;

    /// Persist the status of a monitor/pool association
    async fn update_pool_health_monitor(
        &self,
        ctx: &RequestContext,
        monitor_id: &str,
        pool_id: &str,
        status: ObjectStatus,
        message: &str,
    ) -> Result<(), HostError>;

    /// Remove the local VIP record
    async fn delete_vip(&self, ctx: &RequestContext, vip_id: &str) -> Result<(), HostError>;

    /// Remove the local pool record
    async fn delete_pool(&self, ctx: &RequestContext, pool_id: &str) -> Result<(), HostError>;

    /// Remove the local member record
    async fn delete_member(&self, ctx: &RequestContext, member_id: &str) -> Result<(), HostError>;

    /// Remove the local monitor/pool association
    async fn delete_pool_health_monitor(
        &self,
        ctx: &RequestContext,
        monitor_id: &str,
        pool_id: &str,
    ) -> Result<(), HostError>;

    /// List pools matching `filter`
    async fn get_pools(
        &self,
        ctx: &RequestContext,
        filter: &PoolFilter,
    ) -> Result<Vec<Pool>, HostError>;
}

/// Subnet/network/port API of the core networking plugin
#[async_trait]
pub trait CoreNetwork: Send + Sync {
    async fn get_subnet(&self, ctx: &RequestContext, subnet_id: &str)
        -> Result<Subnet, HostError>;

    async fn get_network(
        &self,
        ctx: &RequestContext,
        network_id: &str,
    ) -> Result<Network, HostError>;

    async fn get_ports(
        &self,
        ctx: &RequestContext,
        filter: &PortFilter,
    ) -> Result<Vec<Port>, HostError>;

    async fn create_port(
        &self,
        ctx: &RequestContext,
        request: &PortRequest,
    ) -> Result<Port, HostError>;

    async fn delete_port(&self, ctx: &RequestContext, port_id: &str) -> Result<(), HostError>;
}
