use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// An upstream resolver address. Accepts `ip`, `ip:port`, `[v6]:port` and
/// bare IPv6 literals; the port defaults to 53.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nameserver(SocketAddr);

impl Nameserver {
    pub fn new(addr: SocketAddr) -> Self {
        Self(addr)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.0
    }

    /// Parses every entry of a configured list, failing on the first bad one.
    pub fn parse_list<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Self>, DomainError> {
        entries.iter().map(|s| s.as_ref().parse()).collect()
    }
}

impl FromStr for Nameserver {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(Self(addr));
        }
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
        }
        Err(DomainError::InvalidNameserver(s.to_string()))
    }
}

impl From<SocketAddr> for Nameserver {
    fn from(addr: SocketAddr) -> Self {
        Self(addr)
    }
}

impl fmt::Display for Nameserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
