use serde::Serialize;

/// One name/count pair in a capped top-N list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopItem {
    pub name: String,
    pub count: u64,
}

impl TopItem {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Reporting granularity requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeGranularity {
    Hours,
    Days,
}

/// Query-facing statistics summary rendered from the live Unit.
///
/// Fixed, strongly-typed shape consumed by the reporting layer; zero
/// valued when no queries have completed yet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsReport {
    pub total_queries: u64,
    pub blocked_filtering: u64,
    pub replaced_safebrowsing: u64,
    pub replaced_safesearch: u64,
    pub replaced_parental: u64,
    /// Average processing time in seconds.
    pub avg_processing_time: f64,
    pub top_queried_domains: Vec<TopItem>,
    pub top_blocked_domains: Vec<TopItem>,
    pub top_clients: Vec<TopItem>,
}
