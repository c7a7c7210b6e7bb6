use crate::{StatsRetentionJob, UnitRotationJob};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
                tokio::spawn(async move { self.start().await })
            }
        }
    };
}

impl_spawnable_job!(UnitRotationJob);
impl_spawnable_job!(StatsRetentionJob);

fn spawn_job<J: SpawnableJob>(job: Option<J>, shutdown: &Option<CancellationToken>) {
    if let Some(job) = job {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        Arc::new(job).start_job();
    }
}

/// Builder that wires the background jobs to a shared shutdown token
/// and spawns them onto the runtime.
pub struct JobRunner {
    unit_rotation: Option<UnitRotationJob>,
    stats_retention: Option<StatsRetentionJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            unit_rotation: None,
            stats_retention: None,
            shutdown: None,
        }
    }

    pub fn with_unit_rotation(mut self, job: UnitRotationJob) -> Self {
        self.unit_rotation = Some(job);
        self
    }

    pub fn with_stats_retention(mut self, job: StatsRetentionJob) -> Self {
        self.stats_retention = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("Starting background job runner");

        spawn_job(self.unit_rotation, &self.shutdown);
        spawn_job(self.stats_retention, &self.shutdown);

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
