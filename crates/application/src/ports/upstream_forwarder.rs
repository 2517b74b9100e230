use async_trait::async_trait;
use dockside_dns_domain::{ClientTransport, DomainError};
use hickory_proto::op::Message;

#[async_trait]
pub trait UpstreamForwarder: Send + Sync {
    /// Relays `request` to an upstream over the same transport the client
    /// used. Any decoded response counts as success, whatever its RCODE.
    async fn forward(
        &self,
        request: &Message,
        transport: ClientTransport,
    ) -> Result<Message, DomainError>;
}
