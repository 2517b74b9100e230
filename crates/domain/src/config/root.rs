use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::network::NetworkConfig;
use super::server::ServerConfig;
use crate::Nameserver;

const LOCAL_CONFIG_PATH: &str = "dockside-dns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dockside-dns/config.toml";

/// Main configuration structure for Dockside DNS
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (address, port, interface)
    #[serde(default)]
    pub server: ServerConfig,

    /// Forwarding configuration
    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Optional static network graph
    #[serde(default)]
    pub network: NetworkConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dockside-dns.toml in current directory
    /// 3. /etc/dockside-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(ip) = overrides.listen_ip {
            self.server.listen_ip = ip;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(iface) = overrides.interface {
            self.server.interface = Some(iface);
        }
        if !overrides.nameservers.is_empty() {
            self.dns.nameservers = overrides.nameservers;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.dns.timeout_secs = timeout;
        }
        if let Some(ttl) = overrides.ttl_secs {
            self.dns.ttl_secs = ttl;
        }
        if let Some(capacity) = overrides.cache_capacity {
            self.cache.capacity = capacity;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.debug {
            self.logging.debug = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if !self.server.listen_ip.is_empty()
            && self.server.listen_ip.parse::<std::net::IpAddr>().is_err()
        {
            return Err(ConfigError::Validation(format!(
                "Invalid listen address '{}'",
                self.server.listen_ip
            )));
        }

        if self.dns.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Upstream timeout cannot be 0".to_string(),
            ));
        }

        if self.cache.capacity == 0 {
            return Err(ConfigError::Validation(
                "Cache capacity cannot be 0".to_string(),
            ));
        }

        Nameserver::parse_list(&self.dns.nameservers)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        for container in &self.network.containers {
            if container.name.is_empty() {
                return Err(ConfigError::Validation(
                    "Container name cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub listen_ip: Option<String>,
    pub port: Option<u16>,
    pub interface: Option<String>,
    pub nameservers: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub ttl_secs: Option<u32>,
    pub cache_capacity: Option<usize>,
    pub log_level: Option<String>,
    pub debug: bool,
}
