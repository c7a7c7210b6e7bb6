use async_trait::async_trait;
use std::net::IpAddr;
use tally_dns_domain::{ClientSource, DomainError};

/// Registry of known network clients.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Whether the address already belongs to a known client.
    ///
    /// Called inline on the request path; implementations must answer
    /// from memory without suspending.
    fn exists(&self, ip: IpAddr) -> bool;

    /// Register a hostname for an address. Returns `false` when the
    /// registry refused the update (e.g. a higher-trust source already
    /// named this client).
    async fn add_host(
        &self,
        ip: IpAddr,
        hostname: &str,
        source: ClientSource,
    ) -> Result<bool, DomainError>;
}
