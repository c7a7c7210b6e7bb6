use async_trait::async_trait;
use hickory_proto::op::Message;
use tally_dns_domain::DomainError;

/// Interchangeable upstream DNS query capability.
///
/// Used by the rDNS worker for PTR lookups; the same capability serves
/// general forwarding outside this core. Implementations own their
/// transport and apply their own timeout.
#[async_trait]
pub trait UpstreamQueryExecutor: Send + Sync {
    async fn exchange(&self, query: &Message) -> Result<Message, DomainError>;
}
