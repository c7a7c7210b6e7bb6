use std::sync::Arc;
use std::time::Duration;
use tally_dns_application::StatsEngine;
use tokio_util::sync::CancellationToken;
use tracing::info;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Periodic poll that rotates the live statistics bucket at hour
/// boundaries.
///
/// A coarse poll instead of a precise timer: after a clock jump or
/// suspend/resume the next tick simply observes the new hour and
/// rotates, with no boundary scheduling to repair.
pub struct UnitRotationJob {
    engine: Arc<StatsEngine>,
    poll_interval_secs: u64,
    shutdown: CancellationToken,
}

impl UnitRotationJob {
    pub fn new(engine: Arc<StatsEngine>) -> Self {
        Self {
            engine,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, poll_secs: u64) -> Self {
        self.poll_interval_secs = poll_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            poll_interval_secs = self.poll_interval_secs,
            "Starting statistics rotation job"
        );

        let job = Arc::clone(&self);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(job.poll_interval_secs));
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("UnitRotationJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        job.engine.rotate_if_needed().await;
                    }
                }
            }
        });
    }
}
