use std::sync::Arc;
use std::time::Duration;
use tally_dns_application::ports::UnitStore;
use tally_dns_application::StatsEngine;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Periodic sweep deleting persisted buckets that fell out of the
/// engine's retention window.
///
/// Reads the window from the engine on every pass, so runtime
/// reconfiguration takes effect at the next sweep without restarting
/// the job.
pub struct StatsRetentionJob {
    engine: Arc<StatsEngine>,
    store: Arc<dyn UnitStore>,
    sweep_interval_secs: u64,
    shutdown: CancellationToken,
}

impl StatsRetentionJob {
    pub fn new(engine: Arc<StatsEngine>, store: Arc<dyn UnitStore>) -> Self {
        Self {
            engine,
            store,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, sweep_secs: u64) -> Self {
        self.sweep_interval_secs = sweep_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            sweep_interval_secs = self.sweep_interval_secs,
            retention_days = self.engine.retention_days(),
            "Starting statistics retention job"
        );

        let job = Arc::clone(&self);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(job.sweep_interval_secs));
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("StatsRetentionJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let cutoff = job.engine.retention_cutoff_hour();
                        match job.store.delete_older_than(cutoff).await {
                            Ok(0) => {}
                            Ok(deleted) => {
                                info!(deleted, cutoff_hour = cutoff, "Swept expired stats buckets");
                            }
                            Err(e) => {
                                error!(error = %e, "Stats retention sweep failed");
                            }
                        }
                    }
                }
            }
        });
    }
}
