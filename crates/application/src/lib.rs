//! Tally DNS Application Layer
//!
//! Ports (traits) consumed by the statistics engine and the rDNS
//! resolver, plus the services themselves. Adapters live in the
//! infrastructure crate; background scheduling lives in the jobs crate.
pub mod ports;
pub mod services;

pub use services::rdns::{rdns_pair, RdnsResolver, RdnsWorker};
pub use services::stats_engine::StatsEngine;
