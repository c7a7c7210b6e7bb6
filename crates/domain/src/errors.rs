use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid stats entry: {0}")]
    InvalidStatsEntry(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Record encoding error: {0}")]
    EncodingError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Upstream timeout connecting to {server}")]
    UpstreamTimeout { server: String },

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
