use crate::report::TopItem;
use crate::stats::{FilterResult, StatsEntry};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;

/// Hour index of a unix timestamp (the live Unit's identity).
#[inline]
pub fn hour_index(unix_secs: u64) -> u64 {
    unix_secs / 3600
}

/// Storage partition key for an hour index: zero-padded `YYYYMMDDHH`.
///
/// Deterministic so that a restarted process finds the bucket it was
/// writing into, and lexicographically ordered so retention sweeps can
/// compare keys directly.
pub fn bucket_key(hour: u64) -> String {
    let ts = (hour * 3600) as i64;
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y%m%d%H").to_string(),
        // Unreachable for hour indices derived from real clocks.
        None => format!("{:010}", hour),
    }
}

/// Live, mutable aggregate for one hour-aligned time bucket.
///
/// Exactly one Unit is live per engine; it is mutated only under the
/// engine's lock and is discarded after rotation flushes it.
#[derive(Debug)]
pub struct Unit {
    pub id: u64,
    pub total_queries: u64,
    pub counts_by_result: [u64; FilterResult::COUNT],
    pub domain_counts: HashMap<String, u64>,
    pub blocked_domain_counts: HashMap<String, u64>,
    pub client_counts: HashMap<String, u64>,
    pub time_sum_micros: u64,
}

impl Unit {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            total_queries: 0,
            counts_by_result: [0; FilterResult::COUNT],
            domain_counts: HashMap::new(),
            blocked_domain_counts: HashMap::new(),
            client_counts: HashMap::new(),
            time_sum_micros: 0,
        }
    }

    /// Apply one validated entry to the counters.
    ///
    /// Callers must have run `StatsEntry::validate` first; entries whose
    /// client address fails to parse are ignored.
    pub fn add(&mut self, entry: &StatsEntry) {
        let Some(client) = entry.client_addr() else {
            return;
        };

        self.total_queries += 1;
        self.counts_by_result[entry.result.index()] += 1;

        *self
            .domain_counts
            .entry(entry.domain.clone())
            .or_insert(0) += 1;
        if entry.result.is_blocked() {
            *self
                .blocked_domain_counts
                .entry(entry.domain.clone())
                .or_insert(0) += 1;
        }
        *self
            .client_counts
            .entry(client.to_string())
            .or_insert(0) += 1;

        self.time_sum_micros += entry.elapsed_micros();
    }

    /// Settled average latency in microseconds; zero when no queries.
    pub fn avg_time_micros(&self) -> u64 {
        if self.total_queries == 0 {
            0
        } else {
            self.time_sum_micros / self.total_queries
        }
    }

    /// Fold a previously persisted record back into this Unit.
    ///
    /// Used at startup to resume counting after a mid-hour restart. The
    /// record is already truncated to top-N, so the long tail of the
    /// pre-restart maps does not survive.
    pub fn merge_record(&mut self, record: &UnitRecord) {
        self.total_queries += record.total_queries;
        for (i, count) in record.counts_by_result.iter().enumerate() {
            self.counts_by_result[i] += count;
        }
        for item in &record.top_domains {
            *self.domain_counts.entry(item.name.clone()).or_insert(0) += item.count;
        }
        for item in &record.top_blocked_domains {
            *self
                .blocked_domain_counts
                .entry(item.name.clone())
                .or_insert(0) += item.count;
        }
        for item in &record.top_clients {
            *self.client_counts.entry(item.name.clone()).or_insert(0) += item.count;
        }
        self.time_sum_micros += record.avg_time_micros * record.total_queries;
    }
}

/// Persisted, truncated summary of a retired Unit.
///
/// Lossy: the unbounded per-name maps are cut down to top-N at flush
/// time. Records written by the scalar-only schema revision decode with
/// empty lists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitRecord {
    pub total_queries: u64,
    pub counts_by_result: [u64; FilterResult::COUNT],
    pub top_domains: Vec<TopItem>,
    pub top_blocked_domains: Vec<TopItem>,
    pub top_clients: Vec<TopItem>,
    pub avg_time_micros: u64,
}
