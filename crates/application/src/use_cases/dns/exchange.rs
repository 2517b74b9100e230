use dockside_dns_domain::ClientTransport;
use hickory_proto::op::{Message, ResponseCode};
use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub message: Message,
    pub client_ip: IpAddr,
    pub transport: ClientTransport,
}

impl DnsRequest {
    pub fn new(message: Message, client_ip: IpAddr, transport: ClientTransport) -> Self {
        Self {
            message,
            client_ip,
            transport,
        }
    }
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Authoritative,
    Cache,
    Upstream,
    /// Built locally to report an error (`ServFail`, `NotImp`, `FormErr`).
    Rejected(ResponseCode),
}

/// A response already encoded for the client's transport.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub bytes: Vec<u8>,
    pub source: ResponseSource,
}

impl DnsResponse {
    pub fn new(bytes: Vec<u8>, source: ResponseSource) -> Self {
        Self { bytes, source }
    }
}
