//! End-to-end check of the rotation job driving the engine into the
//! real SQLite store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tally_dns_application::ports::{Clock, UnitStore};
use tally_dns_application::StatsEngine;
use tally_dns_domain::{FilterResult, StatsConfig, StatsEntry};
use tally_dns_infrastructure::database::create_pool;
use tally_dns_infrastructure::SqliteUnitStore;
use tally_dns_jobs::UnitRotationJob;
use tempfile::TempDir;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

// 2019-03-01 14:00 UTC.
const BASE_SECS: u64 = 1_551_448_800;
const BASE_HOUR: u64 = BASE_SECS / 3600;

struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    fn new(secs: u64) -> Self {
        Self {
            secs: AtomicU64::new(secs),
        }
    }

    fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> u64 {
        self.secs.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn test_rotation_job_persists_bucket_to_sqlite() {
    let dir = TempDir::new().unwrap();
    let pool = create_pool(dir.path().join("stats.db").to_str().unwrap())
        .await
        .unwrap();
    let store = Arc::new(SqliteUnitStore::new(pool).await.unwrap());
    let clock = Arc::new(ManualClock::new(BASE_SECS));

    let engine = Arc::new(
        StatsEngine::open(
            Some(Arc::clone(&store) as Arc<dyn UnitStore>),
            Arc::clone(&clock) as Arc<dyn Clock>,
            &StatsConfig::default(),
        )
        .await,
    );

    engine.update(&StatsEntry::new(
        "a.com".to_string(),
        vec![10, 0, 0, 1],
        FilterResult::NotFiltered,
        Duration::from_micros(1_500),
    ));
    clock.advance(3600);

    let token = CancellationToken::new();
    let job = UnitRotationJob::new(Arc::clone(&engine))
        .with_interval(60)
        .with_cancellation(token.clone());
    Arc::new(job).start().await;

    // The first tick fires immediately and rotates past the boundary.
    let mut flushed = None;
    for _ in 0..200 {
        flushed = store.get(BASE_HOUR).await.unwrap();
        if flushed.is_some() {
            break;
        }
        sleep(Duration::from_millis(5)).await;
    }
    let record = flushed.expect("rotation job flushed the retired bucket");
    assert_eq!(record.total_queries, 1);
    assert_eq!(record.avg_time_micros, 1_500);

    token.cancel();
}
