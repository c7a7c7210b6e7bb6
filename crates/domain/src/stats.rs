use crate::errors::DomainError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

/// Outcome of DNS request filtering.
///
/// The discriminants are persisted as array indices in stats records and
/// must stay stable across schema revisions. Zero is reserved for
/// "unset" and never constructs a valid result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FilterResult {
    NotFiltered = 1,
    Filtered = 2,
    SafeBrowsingBlocked = 3,
    SafeSearchEnforced = 4,
    ParentalBlocked = 5,
}

impl FilterResult {
    /// Number of result kinds (size of per-kind counter arrays).
    pub const COUNT: usize = 5;

    /// Zero-based index into per-kind counter arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::NotFiltered),
            1 => Some(Self::Filtered),
            2 => Some(Self::SafeBrowsingBlocked),
            3 => Some(Self::SafeSearchEnforced),
            4 => Some(Self::ParentalBlocked),
            _ => None,
        }
    }

    /// True for every category that replaced or refused the real answer.
    pub fn is_blocked(self) -> bool {
        !matches!(self, Self::NotFiltered)
    }
}

impl TryFrom<u8> for FilterResult {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, DomainError> {
        match value {
            1 => Ok(Self::NotFiltered),
            2 => Ok(Self::Filtered),
            3 => Ok(Self::SafeBrowsingBlocked),
            4 => Ok(Self::SafeSearchEnforced),
            5 => Ok(Self::ParentalBlocked),
            other => Err(DomainError::InvalidStatsEntry(format!(
                "unset or unknown filter result: {}",
                other
            ))),
        }
    }
}

/// One completed DNS query, as reported by the request-handling path.
///
/// The client address is carried as the raw bytes observed on the socket
/// (4 for IPv4, 16 for IPv6); anything else fails validation.
#[derive(Debug, Clone)]
pub struct StatsEntry {
    pub domain: String,
    pub client: Vec<u8>,
    pub result: FilterResult,
    pub elapsed: Duration,
}

impl StatsEntry {
    pub fn new(domain: String, client: Vec<u8>, result: FilterResult, elapsed: Duration) -> Self {
        Self {
            domain,
            client,
            result,
            elapsed,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.domain.is_empty() {
            return Err(DomainError::InvalidStatsEntry(
                "empty domain".to_string(),
            ));
        }
        if self.client.len() != 4 && self.client.len() != 16 {
            return Err(DomainError::InvalidStatsEntry(format!(
                "client address must be 4 or 16 bytes, got {}",
                self.client.len()
            )));
        }
        Ok(())
    }

    /// Parsed client address, `None` when the byte length is invalid.
    pub fn client_addr(&self) -> Option<IpAddr> {
        match self.client.len() {
            4 => {
                let octets: [u8; 4] = self.client.as_slice().try_into().ok()?;
                Some(IpAddr::V4(Ipv4Addr::from(octets)))
            }
            16 => {
                let octets: [u8; 16] = self.client.as_slice().try_into().ok()?;
                Some(IpAddr::V6(Ipv6Addr::from(octets)))
            }
            _ => None,
        }
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.elapsed.as_micros() as u64
    }
}
