//! UDP transport for upstream queries (RFC 1035 §4.2.1).
//!
//! Messages are sent as-is. A truncated upstream answer is returned to the
//! client unchanged; the client decides whether to retry over TCP.

use super::{map_io_error, message_id, timeout_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use dockside_dns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Largest datagram an upstream may send us.
const MAX_UDP_RESPONSE_SIZE: usize = 65_535;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| map_io_error(self.server_addr, e))?;
        // connected socket: ICMP port-unreachable surfaces as ConnectionRefused
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| map_io_error(self.server_addr, e))?;

        let bytes_sent = socket
            .send(message_bytes)
            .await
            .map_err(|e| map_io_error(self.server_addr, e))?;
        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let expected_id = message_id(message_bytes);
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let len = socket
                .recv(&mut recv_buf)
                .await
                .map_err(|e| map_io_error(self.server_addr, e))?;

            if message_id(&recv_buf[..len]) != expected_id {
                warn!(
                    server = %self.server_addr,
                    bytes = len,
                    "Ignoring UDP response with mismatched id"
                );
                continue;
            }

            recv_buf.truncate(len);
            debug!(server = %self.server_addr, bytes_received = len, "UDP response received");
            return Ok(recv_buf);
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let bytes = tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| timeout_error(self.server_addr))??;

        Ok(TransportResponse {
            bytes,
            protocol_used: "UDP",
        })
    }
}
