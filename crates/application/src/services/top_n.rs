use std::collections::HashMap;
use tally_dns_domain::{TopItem, TopOrder, Unit, UnitRecord};

/// Sort a frequency map by count and keep the first `max` entries.
///
/// With `TopOrder::HighestFirst` this keeps the most-counted names.
/// `TopOrder::LowestFirst` is the historical behavior: ascending sort
/// then slice, which under overflow retains the least-counted names.
/// Ties break by map iteration order and must be treated as
/// non-deterministic.
pub fn truncate_counts(counts: &HashMap<String, u64>, max: usize, order: TopOrder) -> Vec<TopItem> {
    let mut items: Vec<TopItem> = counts
        .iter()
        .map(|(name, count)| TopItem::new(name.clone(), *count))
        .collect();
    match order {
        TopOrder::LowestFirst => items.sort_by(|a, b| a.count.cmp(&b.count)),
        TopOrder::HighestFirst => items.sort_by(|a, b| b.count.cmp(&a.count)),
    }
    items.truncate(max);
    items
}

/// Produce the persisted summary of a Unit, truncating each per-name
/// map to `max` entries.
pub fn summarize(unit: &Unit, max: usize, order: TopOrder) -> UnitRecord {
    UnitRecord {
        total_queries: unit.total_queries,
        counts_by_result: unit.counts_by_result,
        top_domains: truncate_counts(&unit.domain_counts, max, order),
        top_blocked_domains: truncate_counts(&unit.blocked_domain_counts, max, order),
        top_clients: truncate_counts(&unit.client_counts, max, order),
        avg_time_micros: unit.avg_time_micros(),
    }
}
