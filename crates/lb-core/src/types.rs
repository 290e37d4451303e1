//! Load-balancer domain objects and core-network placement objects
//!
//! All of these entities are owned by the host framework's database; the
//! driver reads them, mirrors them onto the appliance, and reports status
//! back. Nothing here is persisted by the driver itself.

use std::net::IpAddr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

/// Per-request call context supplied by the host framework
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub tenant_id: String,
}

impl RequestContext {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
        }
    }
}

/// Lifecycle status of a managed object as persisted by the host
///
/// The driver only ever moves an object from `Pending` to `Active` or
/// `Error`; there is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectStatus {
    Pending,
    Active,
    Error,
}

impl std::fmt::Display for ObjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectStatus::Pending => write!(f, "PENDING"),
            ObjectStatus::Active => write!(f, "ACTIVE"),
            ObjectStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Entity kinds the host tracks a direct status for
///
/// Health monitors are not listed: their status lives on the pool
/// association, not on the monitor itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Vip,
    Pool,
    Member,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Vip => write!(f, "vip"),
            EntityKind::Pool => write!(f, "pool"),
            EntityKind::Member => write!(f, "member"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Http,
    Https,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LbMethod {
    RoundRobin,
    LeastConnections,
    SourceIp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPersistenceType {
    SourceIp,
    HttpCookie,
    AppCookie,
}

/// Session stickiness policy attached to a VIP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPersistence {
    #[serde(rename = "type")]
    pub kind: SessionPersistenceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MonitorType {
    Ping,
    Tcp,
    Http,
    Https,
}

impl MonitorType {
    /// HTTP-family monitors carry method/path/expected-codes knobs
    pub fn is_http_family(&self) -> bool {
        matches!(self, MonitorType::Http | MonitorType::Https)
    }
}

/// Virtual IP fronting a pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vip {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub description: String,
    pub protocol: Protocol,
    pub address: IpAddr,
    pub protocol_port: u16,
    pub pool_id: String,
    pub session_persistence: Option<SessionPersistence>,
    pub connection_limit: Option<i32>,
    /// Port the host allocated for the VIP address
    pub port_id: String,
    pub subnet_id: String,
    pub admin_state_up: bool,
    pub status: ObjectStatus,
}

/// Backend pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub description: String,
    pub protocol: Protocol,
    pub subnet_id: String,
    pub lb_method: LbMethod,
    pub vip_id: Option<String>,
    pub admin_state_up: bool,
    pub status: ObjectStatus,
}

/// Pool member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub tenant_id: String,
    pub address: IpAddr,
    pub protocol_port: u16,
    pub pool_id: String,
    pub weight: u32,
    pub admin_state_up: bool,
    pub status: ObjectStatus,
}

/// Health monitor definition
///
/// Association with a pool happens through the pool-scoped driver
/// operations, not through a field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMonitor {
    pub id: String,
    pub tenant_id: String,
    pub monitor_type: MonitorType,
    pub delay: u32,
    pub timeout: u32,
    pub max_retries: u32,
    pub http_method: Option<String>,
    pub url_path: Option<String>,
    pub expected_codes: Option<String>,
    pub admin_state_up: bool,
}

/// Traffic counters reported by the appliance for one pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub active_connections: u64,
    pub total_connections: u64,
}

/// Subnet as exposed by the core networking plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub tenant_id: String,
    pub network_id: String,
    pub cidr: IpNet,
    pub gateway_ip: Option<IpAddr>,
}

/// Network as exposed by the core networking plugin
///
/// The provider attributes are only present on provider networks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub network_type: Option<String>,
    pub segmentation_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIp {
    pub subnet_id: String,
    pub ip_address: IpAddr,
}

/// Port as exposed by the core networking plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub tenant_id: String,
    pub network_id: String,
    pub name: String,
    pub admin_state_up: bool,
    pub device_id: String,
    pub device_owner: String,
    pub fixed_ips: Vec<FixedIp>,
}

/// Port creation request sent to the core networking plugin
#[derive(Debug, Clone)]
pub struct PortRequest {
    pub tenant_id: String,
    pub name: String,
    pub network_id: String,
    pub admin_state_up: bool,
    pub device_id: String,
    pub device_owner: String,
    pub fixed_ip: FixedIpRequest,
}

/// Fixed-IP request on a port: pin the subnet, optionally pin the address
#[derive(Debug, Clone)]
pub struct FixedIpRequest {
    pub subnet_id: String,
    pub ip_address: Option<IpAddr>,
}

/// Filter for core-plugin port queries; `None` fields match anything
#[derive(Debug, Clone, Default)]
pub struct PortFilter {
    pub network_id: Option<String>,
    pub tenant_id: Option<String>,
    pub device_id: Option<String>,
    pub device_owner: Option<String>,
}

/// Filter for host pool queries; `None` fields match anything
#[derive(Debug, Clone, Default)]
pub struct PoolFilter {
    pub subnet_id: Option<String>,
    pub tenant_id: Option<String>,
}
