use std::net::IpAddr;
use std::sync::Arc;

/// Where a client's hostname was learned from.
///
/// Ordered by trust: a hostname from a lower-ranked source never
/// overwrites one from a higher-ranked source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClientSource {
    Rdns,
    Dhcp,
    Manual,
}

impl ClientSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rdns => "rdns",
            Self::Dhcp => "dhcp",
            Self::Manual => "manual",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rdns" => Some(Self::Rdns),
            "dhcp" => Some(Self::Dhcp),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

/// A network client observed via DNS queries.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: Option<i64>,
    pub ip_address: IpAddr,
    pub hostname: Option<Arc<str>>,
    pub source: Option<ClientSource>,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
}

impl Client {
    pub fn new(ip_address: IpAddr) -> Self {
        Self {
            id: None,
            ip_address,
            hostname: None,
            source: None,
            first_seen: None,
            last_seen: None,
        }
    }
}
