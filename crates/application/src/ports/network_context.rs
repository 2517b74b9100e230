use dockside_dns_domain::{ContainerRef, Endpoint, ScopedAlias};
use std::net::IpAddr;

/// Read-only view over the container network graph.
///
/// Implementations must be safe to call concurrently. Each call is expected
/// to be internally consistent; nothing is promised across calls.
pub trait NetworkContext: Send + Sync {
    /// Identifies the requesting container from the source address.
    fn container_by_addr(&self, addr: IpAddr) -> Option<Endpoint>;

    fn containers_by_alias(&self, alias: &ScopedAlias) -> Vec<ContainerRef>;

    /// Case-sensitive lookup by short name.
    fn container(&self, name: &str) -> Option<ContainerRef>;

    /// The container's endpoint on `scope`, if it is attached there.
    fn endpoint(&self, container: &ContainerRef, scope: &str) -> Option<Endpoint>;

    /// Endpoints of the container across all scopes.
    fn endpoints(&self, container: &ContainerRef) -> Vec<Endpoint>;
}
