use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Ordered upstream list; empty means discover from the system resolver
    /// configuration.
    #[serde(default)]
    pub nameservers: Vec<String>,

    /// Per-upstream read/write timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TTL of authoritative answers and uniform lifetime of cache entries.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u32,
}

impl DnsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs as u64)
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            nameservers: vec![],
            timeout_secs: default_timeout_secs(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    4
}

fn default_ttl_secs() -> u32 {
    600
}
