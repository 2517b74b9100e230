use std::fmt;

/// Smallest UDP payload every resolver must accept (RFC 1035 §4.2.1).
pub const MIN_UDP_PAYLOAD: usize = 512;

/// Largest message that fits behind the two-byte TCP length prefix.
pub const MAX_TCP_PAYLOAD: usize = 65_534;

/// The transport a client used to reach us. Forwarding and response
/// shaping both follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientTransport {
    Udp,
    Tcp,
}

impl ClientTransport {
    /// Number of wire bytes one response may occupy.
    ///
    /// `edns_payload` is the UDP size advertised in the request's OPT record,
    /// if any. Sizes below 512 are raised to 512.
    pub fn payload_budget(self, edns_payload: Option<u16>) -> usize {
        match self {
            Self::Tcp => MAX_TCP_PAYLOAD,
            Self::Udp => edns_payload
                .map(|size| (size as usize).max(MIN_UDP_PAYLOAD))
                .unwrap_or(MIN_UDP_PAYLOAD),
        }
    }

    pub fn is_tcp(self) -> bool {
        matches!(self, Self::Tcp)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Tcp => "tcp",
        }
    }
}

impl fmt::Display for ClientTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
