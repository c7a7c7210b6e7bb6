//! Tally DNS Domain Layer
pub mod client;
pub mod config;
pub mod errors;
pub mod report;
pub mod stats;
pub mod stats_unit;

pub use client::{Client, ClientSource};
pub use config::{RdnsConfig, StatsConfig, TopOrder};
pub use errors::DomainError;
pub use report::{StatsReport, TimeGranularity, TopItem};
pub use stats::{FilterResult, StatsEntry};
pub use stats_unit::{bucket_key, hour_index, Unit, UnitRecord};
