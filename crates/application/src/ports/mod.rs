mod client_registry;
mod clock;
mod unit_store;
mod upstream_executor;

pub use client_registry::ClientRegistry;
pub use clock::{Clock, SystemClock};
pub use unit_store::UnitStore;
pub use upstream_executor::UpstreamQueryExecutor;
