use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid nameserver address: {0}")]
    InvalidNameserver(String),

    #[error("No nameservers defined, can not forward")]
    NoNameservers,

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport I/O error with {server}: {reason}")]
    TransportIo { server: String, reason: String },

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Failed to encode DNS message: {0}")]
    EncodeFailed(String),

    #[error("No ip for container {0:?}")]
    UnusableEndpoint(String),

    #[error("Failed to bind {transport} socket on {addr}: {reason}")]
    BindFailed {
        transport: &'static str,
        addr: String,
        reason: String,
    },

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// Errors that mean "this nameserver could not be reached", which makes
    /// the forwarder rotate to the next one.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::TransportTimeout { .. }
                | Self::TransportConnectionRefused { .. }
                | Self::TransportIo { .. }
                | Self::InvalidDnsMessage(_)
        )
    }
}
