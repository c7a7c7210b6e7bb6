use crate::ports::{Clock, UnitStore};
use crate::services::top_n;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tally_dns_domain::{
    hour_index, FilterResult, StatsConfig, StatsEntry, StatsReport, TimeGranularity, TopOrder,
    Unit, UnitRecord,
};
use tracing::{debug, error, info, warn};

/// Time-bucketed DNS statistics engine.
///
/// Owns the live hour bucket and mutates it under its lock; a jobs-crate
/// poll drives `rotate_if_needed` so completed buckets get flushed into
/// the store. Constructed once at startup and shared by handle; there is
/// no process-wide state.
pub struct StatsEngine {
    live: Mutex<Unit>,
    store: Option<Arc<dyn UnitStore>>,
    clock: Arc<dyn Clock>,
    retention_days: AtomicU32,
    top_count: usize,
    top_order: TopOrder,
}

impl StatsEngine {
    /// Open the engine, resuming this hour's bucket from the store when
    /// a record for it exists (process restarted mid-hour).
    ///
    /// `store` is optional: without one the engine runs in a degraded,
    /// non-persistent mode where counting works but nothing survives a
    /// restart.
    pub async fn open(
        store: Option<Arc<dyn UnitStore>>,
        clock: Arc<dyn Clock>,
        config: &StatsConfig,
    ) -> Self {
        let hour = hour_index(clock.now_unix());
        let mut unit = Unit::new(hour);

        if let Some(store) = &store {
            match store.get(hour).await {
                Ok(Some(record)) => {
                    info!(
                        hour,
                        resumed_queries = record.total_queries,
                        "Resuming statistics for the current hour bucket"
                    );
                    unit.merge_record(&record);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, hour, "Failed to load current hour bucket, starting empty");
                }
            }
        } else {
            warn!("Statistics store unavailable, running in non-persistent mode");
        }

        Self {
            live: Mutex::new(unit),
            store,
            clock,
            retention_days: AtomicU32::new(config.retention_days),
            top_count: config.top_count,
            top_order: config.top_order,
        }
    }

    fn lock_live(&self) -> MutexGuard<'_, Unit> {
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record one completed query.
    ///
    /// Invalid entries are discarded silently; the request path must
    /// never fail because stats recording did. Never performs I/O.
    pub fn update(&self, entry: &StatsEntry) {
        if let Err(e) = entry.validate() {
            debug!(error = %e, "Discarding invalid stats entry");
            return;
        }
        self.lock_live().add(entry);
    }

    /// Render the query-facing summary from the live bucket.
    ///
    /// The granularity argument is part of the reporting contract; the
    /// current revision renders from the live Unit regardless.
    pub fn report(&self, _granularity: TimeGranularity) -> StatsReport {
        let unit = self.lock_live();
        StatsReport {
            total_queries: unit.total_queries,
            blocked_filtering: unit.counts_by_result[FilterResult::Filtered.index()],
            replaced_safebrowsing: unit.counts_by_result
                [FilterResult::SafeBrowsingBlocked.index()],
            replaced_safesearch: unit.counts_by_result[FilterResult::SafeSearchEnforced.index()],
            replaced_parental: unit.counts_by_result[FilterResult::ParentalBlocked.index()],
            avg_processing_time: unit.avg_time_micros() as f64 / 1_000_000.0,
            top_queried_domains: top_n::truncate_counts(
                &unit.domain_counts,
                self.top_count,
                self.top_order,
            ),
            top_blocked_domains: top_n::truncate_counts(
                &unit.blocked_domain_counts,
                self.top_count,
                self.top_order,
            ),
            top_clients: top_n::truncate_counts(
                &unit.client_counts,
                self.top_count,
                self.top_order,
            ),
        }
    }

    /// Update the retention window without interrupting counting.
    /// Persisted buckets are pruned by the retention sweep, not here.
    pub fn configure(&self, retention_days: u32) {
        self.retention_days.store(retention_days, Ordering::Relaxed);
        info!(retention_days, "Statistics retention reconfigured");
    }

    pub fn retention_days(&self) -> u32 {
        self.retention_days.load(Ordering::Relaxed)
    }

    /// Hour index before which persisted buckets are out of retention.
    pub fn retention_cutoff_hour(&self) -> u64 {
        let hours = self.retention_days() as u64 * 24;
        hour_index(self.clock.now_unix()).saturating_sub(hours)
    }

    /// Discard the live bucket and erase all persisted buckets.
    pub async fn clear(&self) {
        let hour = hour_index(self.clock.now_unix());
        {
            let mut unit = self.lock_live();
            *unit = Unit::new(hour);
        }
        if let Some(store) = &self.store {
            if let Err(e) = store.delete_all().await {
                error!(error = %e, "Failed to clear persisted statistics");
            }
        }
        info!("Statistics cleared");
    }

    /// Rotate the live bucket if the wall clock crossed an hour
    /// boundary since it was created.
    ///
    /// The swap happens under the lock so no update lands in a bucket
    /// that is already being flushed; the flush itself runs after the
    /// lock is released. Driven by a coarse periodic poll rather than a
    /// precise timer so clock jumps and suspend/resume stay correct.
    pub async fn rotate_if_needed(&self) {
        let hour = hour_index(self.clock.now_unix());
        let retired = {
            let mut unit = self.lock_live();
            if unit.id == hour {
                return;
            }
            std::mem::replace(&mut *unit, Unit::new(hour))
        };
        info!(
            retired_hour = retired.id,
            new_hour = hour,
            queries = retired.total_queries,
            "Rotating statistics bucket"
        );
        self.flush(&retired).await;
    }

    /// Flush the live bucket and stop.
    ///
    /// Terminal call in the engine's lifecycle; not safe to run
    /// concurrently with any other engine operation.
    pub async fn close(&self) {
        let (hour, record) = {
            let unit = self.lock_live();
            (unit.id, self.summarize(&unit))
        };
        self.put(hour, &record).await;
        info!(hour, "Statistics engine closed");
    }

    fn summarize(&self, unit: &Unit) -> UnitRecord {
        top_n::summarize(unit, self.top_count, self.top_order)
    }

    async fn flush(&self, unit: &Unit) {
        let record = self.summarize(unit);
        self.put(unit.id, &record).await;
    }

    async fn put(&self, hour: u64, record: &UnitRecord) {
        let Some(store) = &self.store else {
            return;
        };
        // Flush failures lose that hour's counters but never take the
        // engine down.
        if let Err(e) = store.put(hour, record).await {
            error!(error = %e, hour, "Failed to persist statistics bucket");
        }
    }
}
