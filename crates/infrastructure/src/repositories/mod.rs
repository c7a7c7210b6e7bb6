mod client_registry;
mod unit_record_codec;
mod unit_store;

pub use client_registry::SqliteClientRegistry;
pub use unit_record_codec::{decode_record, encode_record};
pub use unit_store::SqliteUnitStore;
