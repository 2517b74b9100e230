mod network_context;
mod response_cache;
mod upstream_forwarder;

pub use network_context::NetworkContext;
pub use response_cache::{question_key, CacheStats, ResponseCache};
pub use upstream_forwarder::UpstreamForwarder;
