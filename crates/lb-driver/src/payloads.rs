//! Typed request payloads for the appliance API
//!
//! Each resource has two payload shapes: the update struct carries only the
//! mutable attributes, and the creation struct adds the server-assigned
//! identity fields on top (plus network placement for VIPs and pools). The
//! split exists because updates must never re-specify identity fields, and
//! the types enforce that instead of an ad hoc dictionary merge.

use std::net::IpAddr;

use serde::Serialize;

use banggoo_lb_core::types::{
    HealthMonitor, LbMethod, Member, MonitorType, Pool, Protocol, SessionPersistence, Vip,
};

/// Network placement attributes merged into VIP and pool creation requests
#[derive(Debug, Clone, Serialize)]
pub struct NetworkInfo {
    pub network_id: String,
    pub subnet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segmentation_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snat_ip: Option<IpAddr>,
}

/// Mutable VIP attributes
#[derive(Debug, Clone, Serialize)]
pub struct VipUpdate {
    pub name: String,
    pub description: String,
    pub pool_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_limit: Option<i32>,
    pub admin_state_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_persistence: Option<SessionPersistence>,
}

impl VipUpdate {
    pub fn from_vip(vip: &Vip) -> Self {
        Self {
            name: vip.name.clone(),
            description: vip.description.clone(),
            pool_id: vip.pool_id.clone(),
            connection_limit: vip.connection_limit,
            admin_state_up: vip.admin_state_up,
            session_persistence: vip.session_persistence.clone(),
        }
    }
}

/// VIP creation request: identity fields, mutable fields, placement
#[derive(Debug, Clone, Serialize)]
pub struct VipCreate {
    pub id: String,
    pub tenant_id: String,
    pub protocol: Protocol,
    pub address: IpAddr,
    pub protocol_port: u16,
    #[serde(flatten)]
    pub attrs: VipUpdate,
    #[serde(flatten)]
    pub network: NetworkInfo,
}

impl VipCreate {
    pub fn new(vip: &Vip, network: NetworkInfo) -> Self {
        Self {
            id: vip.id.clone(),
            tenant_id: vip.tenant_id.clone(),
            protocol: vip.protocol,
            address: vip.address,
            protocol_port: vip.protocol_port,
            attrs: VipUpdate::from_vip(vip),
            network,
        }
    }
}

/// Mutable pool attributes
#[derive(Debug, Clone, Serialize)]
pub struct PoolUpdate {
    pub name: String,
    pub description: String,
    pub lb_method: LbMethod,
    pub admin_state_up: bool,
}

impl PoolUpdate {
    pub fn from_pool(pool: &Pool) -> Self {
        Self {
            name: pool.name.clone(),
            description: pool.description.clone(),
            lb_method: pool.lb_method,
            admin_state_up: pool.admin_state_up,
        }
    }
}

/// Pool creation request
#[derive(Debug, Clone, Serialize)]
pub struct PoolCreate {
    pub id: String,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip_id: Option<String>,
    pub protocol: Protocol,
    pub subnet_id: String,
    #[serde(flatten)]
    pub attrs: PoolUpdate,
    #[serde(flatten)]
    pub network: NetworkInfo,
}

impl PoolCreate {
    pub fn new(pool: &Pool, network: NetworkInfo) -> Self {
        Self {
            id: pool.id.clone(),
            tenant_id: pool.tenant_id.clone(),
            vip_id: pool.vip_id.clone(),
            protocol: pool.protocol,
            subnet_id: pool.subnet_id.clone(),
            attrs: PoolUpdate::from_pool(pool),
            network,
        }
    }
}

/// Mutable member attributes
#[derive(Debug, Clone, Serialize)]
pub struct MemberUpdate {
    pub pool_id: String,
    pub weight: u32,
    pub admin_state_up: bool,
}

impl MemberUpdate {
    pub fn from_member(member: &Member) -> Self {
        Self {
            pool_id: member.pool_id.clone(),
            weight: member.weight,
            admin_state_up: member.admin_state_up,
        }
    }
}

/// Member creation request
#[derive(Debug, Clone, Serialize)]
pub struct MemberCreate {
    pub id: String,
    pub tenant_id: String,
    pub address: IpAddr,
    pub protocol_port: u16,
    #[serde(flatten)]
    pub attrs: MemberUpdate,
}

impl MemberCreate {
    pub fn new(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            tenant_id: member.tenant_id.clone(),
            address: member.address,
            protocol_port: member.protocol_port,
            attrs: MemberUpdate::from_member(member),
        }
    }
}

/// Mutable health-monitor attributes
///
/// The HTTP knobs are only sent for HTTP-family monitors; the appliance
/// rejects them on TCP/PING probes.
#[derive(Debug, Clone, Serialize)]
pub struct HealthMonitorUpdate {
    pub delay: u32,
    pub timeout: u32,
    pub max_retries: u32,
    pub admin_state_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_codes: Option<String>,
}

impl HealthMonitorUpdate {
    pub fn from_monitor(monitor: &HealthMonitor) -> Self {
        let mut update = Self {
            delay: monitor.delay,
            timeout: monitor.timeout,
            max_retries: monitor.max_retries,
            admin_state_up: monitor.admin_state_up,
            http_method: None,
            url_path: None,
            expected_codes: None,
        };
        if monitor.monitor_type.is_http_family() {
            update.http_method = monitor.http_method.clone();
            update.url_path = monitor.url_path.clone();
            update.expected_codes = monitor.expected_codes.clone();
        }
        update
    }
}

/// Health-monitor creation request
#[derive(Debug, Clone, Serialize)]
pub struct HealthMonitorCreate {
    pub id: String,
    pub tenant_id: String,
    #[serde(rename = "type")]
    pub monitor_type: MonitorType,
    #[serde(flatten)]
    pub attrs: HealthMonitorUpdate,
}

impl HealthMonitorCreate {
    pub fn new(monitor: &HealthMonitor) -> Self {
        Self {
            id: monitor.id.clone(),
            tenant_id: monitor.tenant_id.clone(),
            monitor_type: monitor.monitor_type,
            attrs: HealthMonitorUpdate::from_monitor(monitor),
        }
    }
}
