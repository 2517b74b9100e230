use dockside_dns_application::use_cases::dns::responses;
use dockside_dns_application::use_cases::{DnsRequest, HandleDnsQueryUseCase};
use dockside_dns_domain::ClientTransport;
use hickory_proto::op::{Message, MessageType};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

const DNS_HEADER_LEN: usize = 12;

/// Turns raw request bytes into raw response bytes. Shared by the UDP and
/// TCP loops.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// `None` means nothing is sent back.
    pub async fn handle_raw(
        &self,
        buf: &[u8],
        client: SocketAddr,
        transport: ClientTransport,
    ) -> Option<Vec<u8>> {
        let message = match Message::from_vec(buf) {
            Ok(message) => message,
            Err(e) if buf.len() >= DNS_HEADER_LEN => {
                let id = u16::from_be_bytes([buf[0], buf[1]]);
                warn!(client = %client, id, error = %e, "Malformed request");
                return responses::format_error(id).ok();
            }
            Err(e) => {
                debug!(client = %client, bytes = buf.len(), error = %e, "Dropping runt packet");
                return None;
            }
        };

        if message.message_type() != MessageType::Query {
            debug!(client = %client, id = message.id(), "Ignoring response packet");
            return None;
        }

        let request = DnsRequest::new(message, client.ip(), transport);
        let response = self.use_case.execute(&request).await?;

        debug!(
            client = %client,
            id = request.message.id(),
            transport = %transport,
            source = ?response.source,
            bytes = response.bytes.len(),
            "Query answered"
        );
        Some(response.bytes)
    }
}
