use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Empty means all interfaces.
    #[serde(default)]
    pub listen_ip: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Device the UDP and TCP sockets are bound to when `listen_ip` is empty.
    #[serde(default)]
    pub interface: Option<String>,
}

impl ServerConfig {
    /// Interface to bind to, honoured only when no explicit listen IP is set.
    pub fn bind_interface(&self) -> Option<&str> {
        match &self.interface {
            Some(iface) if self.listen_ip.is_empty() && !iface.is_empty() => Some(iface),
            _ => None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_ip: String::new(),
            port: default_port(),
            interface: None,
        }
    }
}

fn default_port() -> u16 {
    53
}
