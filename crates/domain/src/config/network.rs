use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Static description of the container network graph, used when the
/// resolver runs without a live graph behind it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainerSpec {
    pub name: String,

    #[serde(default)]
    pub endpoints: Vec<EndpointSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointSpec {
    pub scope: String,

    pub ip: Ipv4Addr,

    /// Names every container on `scope` may use for this container.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Names only a specific container on `scope` may use for this one.
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkSpec {
    pub container: String,
    pub alias: String,
}
