//! Dockside DNS Domain Layer
pub mod config;
pub mod errors;
pub mod nameserver;
pub mod network;
pub mod question;
pub mod transport;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use nameserver::Nameserver;
pub use network::{ContainerRef, Endpoint, ScopedAlias};
pub use question::QuestionKey;
pub use transport::{ClientTransport, MAX_TCP_PAYLOAD, MIN_UDP_PAYLOAD};
