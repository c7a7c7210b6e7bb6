pub mod runner;
pub mod stats_retention;
pub mod unit_rotation;

pub use runner::JobRunner;
pub use stats_retention::StatsRetentionJob;
pub use unit_rotation::UnitRotationJob;
