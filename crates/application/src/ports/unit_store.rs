use async_trait::async_trait;
use tally_dns_domain::{DomainError, UnitRecord};

/// Persistent store for retired hour buckets.
///
/// One record per hour index; key derivation is the store's concern so
/// callers only ever speak hour indices.
#[async_trait]
pub trait UnitStore: Send + Sync {
    /// Write the record for an hour bucket within a single transaction.
    async fn put(&self, hour: u64, record: &UnitRecord) -> Result<(), DomainError>;

    /// Read the record for an hour bucket.
    ///
    /// Absent buckets and undecodable records both yield `None`.
    async fn get(&self, hour: u64) -> Result<Option<UnitRecord>, DomainError>;

    /// Erase every persisted bucket.
    async fn delete_all(&self) -> Result<(), DomainError>;

    /// Delete buckets strictly older than the given hour index.
    /// Returns the number of buckets removed.
    async fn delete_older_than(&self, hour: u64) -> Result<u64, DomainError>;
}
