mod exchange;
mod handle_dns_query;
mod resolve_container;
pub mod responses;

pub use exchange::{DnsRequest, DnsResponse, ResponseSource};
pub use handle_dns_query::HandleDnsQueryUseCase;
pub use resolve_container::{AuthoritativeOutcome, ContainerResolver, MissReason};
