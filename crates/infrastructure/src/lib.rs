//! Tally DNS Infrastructure Layer
//!
//! Adapters behind the application ports: the SQLite-backed unit store
//! and client registry, the binary record codec, and the UDP upstream
//! query executor.
pub mod database;
pub mod dns;
pub mod repositories;

pub use dns::UdpUpstreamExecutor;
pub use repositories::{SqliteClientRegistry, SqliteUnitStore};
