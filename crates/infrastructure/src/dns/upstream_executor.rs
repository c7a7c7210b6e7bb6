//! UDP upstream query executor (RFC 1035 §4.2.1).
//!
//! Plain single-shot DNS over UDP: serialize, send from an ephemeral
//! port, wait for one datagram. Sufficient for the PTR lookups the rDNS
//! worker issues; richer transports plug in behind the same port.

use async_trait::async_trait;
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::SocketAddr;
use std::time::Duration;
use tally_dns_application::ports::UpstreamQueryExecutor;
use tally_dns_domain::DomainError;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpUpstreamExecutor {
    server_addr: SocketAddr,
    timeout: Duration,
}

impl UdpUpstreamExecutor {
    pub fn new(server_addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            server_addr,
            timeout,
        }
    }

    fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);
        message.emit(&mut encoder).map_err(|e| {
            DomainError::UpstreamError(format!("Failed to serialize DNS message: {}", e))
        })?;
        Ok(buf)
    }
}

#[async_trait]
impl UpstreamQueryExecutor for UdpUpstreamExecutor {
    async fn exchange(&self, query: &Message) -> Result<Message, DomainError> {
        let message_bytes = Self::serialize(query)?;

        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            "0.0.0.0:0".parse().unwrap()
        } else {
            "[::]:0".parse().unwrap()
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::UpstreamError(format!("Failed to bind UDP socket: {}", e))
        })?;

        tokio::time::timeout(self.timeout, socket.send_to(&message_bytes, self.server_addr))
            .await
            .map_err(|_| DomainError::UpstreamTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| {
                DomainError::UpstreamError(format!(
                    "Failed to send UDP query to {}: {}",
                    self.server_addr, e
                ))
            })?;

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let (bytes_received, from_addr) =
            tokio::time::timeout(self.timeout, socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| DomainError::UpstreamTimeout {
                    server: self.server_addr.to_string(),
                })?
                .map_err(|e| {
                    DomainError::UpstreamError(format!(
                        "Failed to receive UDP response from {}: {}",
                        self.server_addr, e
                    ))
                })?;

        if from_addr.ip() != self.server_addr.ip() {
            warn!(
                expected = %self.server_addr,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        recv_buf.truncate(bytes_received);
        let response = Message::from_vec(&recv_buf).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if response.id() != query.id() {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response ID {} does not match query ID {}",
                response.id(),
                query.id()
            )));
        }

        debug!(
            server = %self.server_addr,
            bytes_received,
            answers = response.answer_count(),
            "UDP exchange completed"
        );
        Ok(response)
    }
}
