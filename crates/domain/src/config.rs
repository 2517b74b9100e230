pub mod cache;
pub mod dns;
pub mod errors;
pub mod logging;
pub mod network;
pub mod root;
pub mod server;

pub use cache::CacheConfig;
pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use network::{ContainerSpec, EndpointSpec, LinkSpec, NetworkConfig};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
