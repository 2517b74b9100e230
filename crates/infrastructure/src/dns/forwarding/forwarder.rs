use crate::dns::transport::create_transport;
use async_trait::async_trait;
use dockside_dns_application::ports::UpstreamForwarder;
use dockside_dns_domain::{ClientTransport, DomainError, Nameserver};
use hickory_proto::op::Message;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);

/// Relays queries to the configured nameservers.
///
/// Each query starts at `id % N` and walks the list once, moving on only
/// when an upstream cannot be reached. Any decoded response, whatever its
/// RCODE, ends the walk.
pub struct DnsForwarder {
    nameservers: Vec<Nameserver>,
    timeout: Duration,
}

impl DnsForwarder {
    pub fn new(nameservers: Vec<Nameserver>) -> Self {
        Self {
            nameservers,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn exchange(
        &self,
        nameserver: &Nameserver,
        request_bytes: &[u8],
        transport: ClientTransport,
    ) -> Result<Message, DomainError> {
        let upstream = create_transport(nameserver.socket_addr(), transport);
        let response = upstream.send(request_bytes, self.timeout).await?;

        Message::from_vec(&response.bytes).map_err(|e| {
            DomainError::InvalidDnsMessage(format!(
                "{} response from {}: {}",
                response.protocol_used, nameserver, e
            ))
        })
    }
}

#[async_trait]
impl UpstreamForwarder for DnsForwarder {
    async fn forward(
        &self,
        request: &Message,
        transport: ClientTransport,
    ) -> Result<Message, DomainError> {
        if self.nameservers.is_empty() {
            return Err(DomainError::NoNameservers);
        }

        let request_bytes = request
            .to_vec()
            .map_err(|e| DomainError::EncodeFailed(e.to_string()))?;

        let count = self.nameservers.len();
        let start = request.id() as usize % count;

        for attempt in 0..count {
            let nameserver = &self.nameservers[(start + attempt) % count];
            match self.exchange(nameserver, &request_bytes, transport).await {
                Ok(response) => {
                    debug!(
                        server = %nameserver,
                        transport = %transport,
                        rcode = ?response.response_code(),
                        "Upstream answered"
                    );
                    return Ok(response);
                }
                Err(e) if e.is_transport_error() => {
                    warn!(
                        server = %nameserver,
                        transport = %transport,
                        attempt = attempt + 1,
                        error = %e,
                        "Upstream failed, trying next nameserver"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::TransportAllServersUnreachable)
    }
}
