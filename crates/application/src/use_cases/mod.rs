pub mod dns;

pub use dns::{
    AuthoritativeOutcome, ContainerResolver, DnsRequest, DnsResponse, HandleDnsQueryUseCase,
    MissReason, ResponseSource,
};
