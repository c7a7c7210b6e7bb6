pub mod rdns;
pub mod stats_engine;
pub mod top_n;
