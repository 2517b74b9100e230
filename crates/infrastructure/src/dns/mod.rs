pub mod cache;
pub mod forwarding;
pub mod listener;
pub mod server;
pub mod transport;

mod socket;

pub use cache::{CacheMetrics, CacheOptions, DnsResponseCache};
pub use forwarding::DnsForwarder;
pub use listener::DnsServer;
pub use server::DnsServerHandler;
