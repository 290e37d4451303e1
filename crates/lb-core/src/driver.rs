//! Load-balancer driver contract
//!
//! One method per lifecycle operation, invoked by the host framework. Update
//! operations receive the previous object alongside the new one; health
//! monitor operations carry the owning pool because their status lives on
//! the pool association.

use async_trait::async_trait;

use crate::error::DriverError;
use crate::types::{HealthMonitor, Member, Pool, PoolStats, RequestContext, Vip};

#[async_trait]
pub trait LoadBalancerDriver: Send + Sync {
    async fn create_vip(&self, ctx: &RequestContext, vip: &Vip) -> Result<(), DriverError>;

    async fn update_vip(
        &self,
        ctx: &RequestContext,
        old_vip: &Vip,
        vip: &Vip,
    ) -> Result<(), DriverError>;

    async fn delete_vip(&self, ctx: &RequestContext, vip: &Vip) -> Result<(), DriverError>;

    async fn create_pool(&self, ctx: &RequestContext, pool: &Pool) -> Result<(), DriverError>;

    async fn update_pool(
        &self,
        ctx: &RequestContext,
        old_pool: &Pool,
        pool: &Pool,
    ) -> Result<(), DriverError>;

    async fn delete_pool(&self, ctx: &RequestContext, pool: &Pool) -> Result<(), DriverError>;

    async fn create_member(&self, ctx: &RequestContext, member: &Member)
        -> Result<(), DriverError>;

    async fn update_member(
        &self,
        ctx: &RequestContext,
        old_member: &Member,
        member: &Member,
    ) -> Result<(), DriverError>;

    async fn delete_member(&self, ctx: &RequestContext, member: &Member)
        -> Result<(), DriverError>;

    async fn create_pool_health_monitor(
        &self,
        ctx: &RequestContext,
        monitor: &HealthMonitor,
        pool_id: &str,
    ) -> Result<(), DriverError>;

    async fn update_pool_health_monitor(
        &self,
        ctx: &RequestContext,
        old_monitor: &HealthMonitor,
        monitor: &HealthMonitor,
        pool_id: &str,
    ) -> Result<(), DriverError>;

    async fn delete_pool_health_monitor(
        &self,
        ctx: &RequestContext,
        monitor: &HealthMonitor,
        pool_id: &str,
    ) -> Result<(), DriverError>;

    /// Retrieve traffic counters for a pool from the appliance
    async fn stats(&self, ctx: &RequestContext, pool_id: &str) -> Result<PoolStats, DriverError>;
}
