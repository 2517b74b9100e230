//! In-memory network graph.
//!
//! Built once (from configuration or by hand) and then only read. Keeps the
//! inverted alias index and an address index so that every lookup the
//! resolver makes is a hash lookup.

use dockside_dns_application::ports::NetworkContext;
use dockside_dns_domain::config::NetworkConfig;
use dockside_dns_domain::{ContainerRef, Endpoint, ScopedAlias};
use rustc_hash::FxHashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Default)]
pub struct StaticNetworkContext {
    containers: FxHashMap<Arc<str>, ContainerRef>,
    endpoints: FxHashMap<Arc<str>, Vec<Endpoint>>,
    by_addr: FxHashMap<IpAddr, Endpoint>,
    aliases: FxHashMap<ScopedAlias, Vec<ContainerRef>>,
}

impl StaticNetworkContext {
    pub fn builder() -> StaticNetworkBuilder {
        StaticNetworkBuilder::default()
    }

    /// `aliases` become scope-wide aliases of the container; `links` become
    /// aliases of the container visible only to the linking container.
    pub fn from_config(config: &NetworkConfig) -> Self {
        let mut builder = Self::builder();
        for container in &config.containers {
            for ep in &container.endpoints {
                builder = builder.endpoint(&container.name, &ep.scope, ep.ip);
                for alias in &ep.aliases {
                    builder = builder.alias(&ep.scope, alias, &container.name);
                }
                for link in &ep.links {
                    builder = builder.link(&ep.scope, &link.container, &link.alias, &container.name);
                }
            }
        }
        builder.build()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

impl NetworkContext for StaticNetworkContext {
    fn container_by_addr(&self, addr: IpAddr) -> Option<Endpoint> {
        self.by_addr.get(&addr).cloned()
    }

    fn containers_by_alias(&self, alias: &ScopedAlias) -> Vec<ContainerRef> {
        self.aliases.get(alias).cloned().unwrap_or_default()
    }

    fn container(&self, name: &str) -> Option<ContainerRef> {
        self.containers.get(name).cloned()
    }

    fn endpoint(&self, container: &ContainerRef, scope: &str) -> Option<Endpoint> {
        self.endpoints
            .get(container.name())?
            .iter()
            .find(|e| e.scope() == scope)
            .cloned()
    }

    fn endpoints(&self, container: &ContainerRef) -> Vec<Endpoint> {
        self.endpoints
            .get(container.name())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct StaticNetworkBuilder {
    graph: StaticNetworkContext,
}

impl StaticNetworkBuilder {
    /// Attaches `container` to `scope`. A second endpoint for the same pair
    /// replaces the first.
    pub fn endpoint(mut self, container: &str, scope: &str, ip: Ipv4Addr) -> Self {
        let container = self.container_ref(container);
        let endpoint = Endpoint::new(container.clone(), scope, ip);

        let eps = self
            .graph
            .endpoints
            .entry(Arc::from(container.name()))
            .or_default();
        let replaced = eps
            .iter()
            .position(|e| e.scope() == scope)
            .map(|pos| eps.remove(pos));
        eps.push(endpoint.clone());

        if let Some(replaced) = replaced {
            let stale = IpAddr::V4(replaced.ip());
            if self.graph.by_addr.get(&stale) == Some(&replaced) {
                self.graph.by_addr.remove(&stale);
            }
        }

        if !ip.is_unspecified() {
            let addr = IpAddr::V4(ip);
            if let Some(previous) = self.graph.by_addr.insert(addr, endpoint) {
                if previous.container() != &container {
                    warn!(
                        %addr,
                        previous = %previous.container(),
                        container = %container,
                        "Address claimed by two containers"
                    );
                }
            }
        }
        self
    }

    /// `alias` names `container` for every container on `scope`.
    pub fn alias(mut self, scope: &str, alias: &str, container: &str) -> Self {
        let container = self.container_ref(container);
        self.index(ScopedAlias::scope_wide(scope, alias), container);
        self
    }

    /// `alias` names `target` only when `requester` asks on `scope`.
    pub fn link(mut self, scope: &str, requester: &str, alias: &str, target: &str) -> Self {
        let target = self.container_ref(target);
        self.index(ScopedAlias::for_container(scope, requester, alias), target);
        self
    }

    pub fn build(self) -> StaticNetworkContext {
        self.graph
    }

    fn container_ref(&mut self, name: &str) -> ContainerRef {
        self.graph
            .containers
            .entry(Arc::from(name))
            .or_insert_with(|| ContainerRef::new(name))
            .clone()
    }

    fn index(&mut self, key: ScopedAlias, container: ContainerRef) {
        let holders = self.graph.aliases.entry(key).or_default();
        if !holders.contains(&container) {
            holders.push(container);
        }
    }
}
