pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use dockside_dns_domain::{ClientTransport, DomainError};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

/// One request/response exchange with an upstream nameserver.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// `timeout` bounds the whole exchange, connect and write included.
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }
}

/// Transport to `server` matching the one the client used.
pub fn create_transport(server: SocketAddr, transport: ClientTransport) -> Transport {
    match transport {
        ClientTransport::Udp => Transport::Udp(udp::UdpTransport::new(server)),
        ClientTransport::Tcp => Transport::Tcp(tcp::TcpTransport::new(server)),
    }
}

pub(crate) fn map_io_error(server: SocketAddr, e: io::Error) -> DomainError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server.to_string(),
        },
        io::ErrorKind::TimedOut => DomainError::TransportTimeout {
            server: server.to_string(),
        },
        _ => DomainError::TransportIo {
            server: server.to_string(),
            reason: e.to_string(),
        },
    }
}

pub(crate) fn timeout_error(server: SocketAddr) -> DomainError {
    DomainError::TransportTimeout {
        server: server.to_string(),
    }
}

/// Transaction ID from the first two bytes of a wire message.
pub(crate) fn message_id(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}
