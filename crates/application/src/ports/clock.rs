use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock source for bucket identity.
///
/// Injected so rotation boundary behavior is testable with simulated
/// time.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
