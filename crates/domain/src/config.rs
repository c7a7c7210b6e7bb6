use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

/// Sort direction applied before truncating a top-N list.
///
/// `LowestFirst` reproduces the historical ascending-sort truncation
/// (under overflow it keeps the least-queried names); `HighestFirst` is
/// the corrected behavior and the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopOrder {
    LowestFirst,
    HighestFirst,
}

impl Default for TopOrder {
    fn default() -> Self {
        Self::HighestFirst
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Path of the embedded statistics database file.
    pub db_path: String,
    /// Persisted buckets older than this many days are swept.
    pub retention_days: u32,
    /// Cap for each persisted/reported top-N list.
    pub top_count: usize,
    pub top_order: TopOrder,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            db_path: "stats.db".to_string(),
            retention_days: 30,
            top_count: 100,
            top_order: TopOrder::default(),
        }
    }
}

impl StatsConfig {
    pub fn from_toml(s: &str) -> Result<Self, DomainError> {
        toml::from_str(s).map_err(|e| DomainError::ConfigError(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RdnsConfig {
    /// Resolver address used for reverse lookups, `host:port`.
    pub upstream: String,
    pub queue_capacity: usize,
    pub timeout_secs: u64,
}

impl Default for RdnsConfig {
    fn default() -> Self {
        Self {
            upstream: "127.0.0.1:53".to_string(),
            queue_capacity: 256,
            timeout_secs: 3,
        }
    }
}

impl RdnsConfig {
    pub fn from_toml(s: &str) -> Result<Self, DomainError> {
        toml::from_str(s).map_err(|e| DomainError::ConfigError(e.to_string()))
    }
}
