use crate::ports::{ClientRegistry, UpstreamQueryExecutor};
use dashmap::DashSet;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RData, RecordType};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tally_dns_domain::{ClientSource, DomainError, RdnsConfig};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Enqueue side of the reverse-DNS pipeline.
///
/// `enqueue` is called inline on the request path and never suspends:
/// known clients are skipped, duplicates are skipped, and when the
/// bounded queue is full the request is shed with a log line. rDNS is
/// best-effort enrichment and never applies backpressure upstream.
pub struct RdnsResolver {
    tx: mpsc::Sender<IpAddr>,
    pending: Arc<DashSet<IpAddr>>,
    registry: Arc<dyn ClientRegistry>,
}

/// Consumer side: a single sequential worker draining the queue.
pub struct RdnsWorker {
    rx: mpsc::Receiver<IpAddr>,
    pending: Arc<DashSet<IpAddr>>,
    registry: Arc<dyn ClientRegistry>,
    upstream: Arc<dyn UpstreamQueryExecutor>,
    timeout: Duration,
}

/// Build the connected resolver/worker pair. The caller spawns
/// `RdnsWorker::run` on the runtime; the worker exits once every
/// resolver handle is dropped and the queue drains.
pub fn rdns_pair(
    registry: Arc<dyn ClientRegistry>,
    upstream: Arc<dyn UpstreamQueryExecutor>,
    config: &RdnsConfig,
) -> (RdnsResolver, RdnsWorker) {
    let (tx, rx) = mpsc::channel(config.queue_capacity);
    let pending = Arc::new(DashSet::new());
    (
        RdnsResolver {
            tx,
            pending: Arc::clone(&pending),
            registry: Arc::clone(&registry),
        },
        RdnsWorker {
            rx,
            pending,
            registry,
            upstream,
            timeout: Duration::from_secs(config.timeout_secs),
        },
    )
}

impl RdnsResolver {
    /// Request hostname discovery for a client address.
    ///
    /// Idempotent: an address that is already queued, or whose lookup
    /// failed permanently, is not queued again.
    pub fn enqueue(&self, ip: IpAddr) {
        if ip.is_loopback() {
            return;
        }
        if self.registry.exists(ip) {
            return;
        }
        // insert() is the atomic Queued transition; false means the
        // address is already queued or failed permanently.
        if !self.pending.insert(ip) {
            return;
        }

        debug!(ip = %ip, "Queueing address for rDNS resolution");
        if self.tx.try_send(ip).is_err() {
            debug!(ip = %ip, "rDNS queue is full, dropping request");
        }
    }

    /// Number of addresses currently queued or permanently failed.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl RdnsWorker {
    /// Drain the queue, one lookup at a time.
    ///
    /// A successful lookup clears the address from the dedup set (it may
    /// be re-resolved if the registry later evicts the client) and
    /// registers the hostname. Any failure leaves the dedup entry in
    /// place, so the address is never retried for the life of the
    /// process.
    pub async fn run(mut self) {
        info!("rDNS worker started");
        while let Some(ip) = self.rx.recv().await {
            match self.resolve(ip).await {
                Ok(hostname) => {
                    debug!(ip = %ip, hostname = %hostname, "rDNS lookup succeeded");
                    self.pending.remove(&ip);
                    match self
                        .registry
                        .add_host(ip, &hostname, ClientSource::Rdns)
                        .await
                    {
                        Ok(true) => {}
                        Ok(false) => {
                            debug!(ip = %ip, "Registry refused rDNS hostname");
                        }
                        Err(e) => {
                            warn!(error = %e, ip = %ip, "Failed to register rDNS hostname");
                        }
                    }
                }
                Err(e) => {
                    debug!(ip = %ip, error = %e, "rDNS lookup failed, address will not be retried");
                }
            }
        }
        info!("rDNS worker shutting down");
    }

    async fn resolve(&self, ip: IpAddr) -> Result<String, DomainError> {
        let query = build_ptr_query(&ip)?;

        let response = tokio::time::timeout(self.timeout, self.upstream.exchange(&query))
            .await
            .map_err(|_| DomainError::UpstreamTimeout {
                server: ip.to_string(),
            })??;

        let answers = response.answers();
        if answers.len() != 1 {
            return Err(DomainError::InvalidDnsResponse(format!(
                "expected exactly one PTR answer, got {}",
                answers.len()
            )));
        }
        match answers[0].data() {
            RData::PTR(ptr) => {
                let mut hostname = ptr.to_utf8();
                if hostname.ends_with('.') {
                    hostname.pop();
                }
                Ok(hostname)
            }
            other => Err(DomainError::InvalidDnsResponse(format!(
                "not a PTR answer: {}",
                other.record_type()
            ))),
        }
    }
}

/// Build a recursive PTR query for the address's reverse name.
pub fn build_ptr_query(ip: &IpAddr) -> Result<Message, DomainError> {
    let name = Name::from_utf8(reverse_name(ip)).map_err(|e| {
        DomainError::InvalidIpAddress(format!("cannot build reverse name for {}: {}", ip, e))
    })?;

    let mut query = Query::new();
    query.set_name(name);
    query.set_query_type(RecordType::PTR);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);
    Ok(message)
}

/// Reverse-lookup domain for an address (`in-addr.arpa` / `ip6.arpa`).
pub fn reverse_name(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(ipv4) => {
            let o = ipv4.octets();
            format!("{}.{}.{}.{}.in-addr.arpa.", o[3], o[2], o[1], o[0])
        }
        IpAddr::V6(ipv6) => {
            let mut nibbles = Vec::with_capacity(32);
            for byte in ipv6.octets().iter().rev() {
                nibbles.push(format!("{:x}", byte & 0x0f));
                nibbles.push(format!("{:x}", (byte >> 4) & 0x0f));
            }
            format!("{}.ip6.arpa.", nibbles.join("."))
        }
    }
}
