use crate::ports::NetworkContext;
use dockside_dns_domain::{ContainerRef, DomainError, Endpoint, ScopedAlias};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Result of an authoritative lookup that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthoritativeOutcome {
    /// Addresses to answer with, already shuffled.
    Answer(Vec<Ipv4Addr>),
    /// The name is not ours to answer; the caller moves on to cache/forward.
    Miss(MissReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    UnknownRequester(IpAddr),
    CrossScope {
        requested: String,
        requester_scope: String,
    },
    NotFound(String),
}

/// Resolves container names and aliases as seen from the requesting
/// container.
///
/// Lookup order: container-scoped alias, then scope-wide alias, then the
/// container's short name. Only endpoints on scopes the requester is attached
/// to are ever returned.
pub struct ContainerResolver {
    network: Arc<dyn NetworkContext>,
    rng: Mutex<fastrand::Rng>,
}

impl ContainerResolver {
    pub fn new(network: Arc<dyn NetworkContext>) -> Self {
        Self {
            network,
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Deterministic answer ordering, for tests.
    pub fn with_seed(network: Arc<dyn NetworkContext>, seed: u64) -> Self {
        Self {
            network,
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    /// `qname` is the question name as received, with or without the
    /// trailing dot.
    pub fn resolve(
        &self,
        qname: &str,
        client_ip: IpAddr,
    ) -> Result<AuthoritativeOutcome, DomainError> {
        let qname = qname.strip_suffix('.').unwrap_or(qname);
        let (name, domain) = match qname.split_once('.') {
            Some((name, domain)) => (name, domain),
            None => (qname, ""),
        };

        let requester = match self.network.container_by_addr(client_ip) {
            Some(e) => e,
            None => {
                return Ok(AuthoritativeOutcome::Miss(MissReason::UnknownRequester(
                    client_ip,
                )))
            }
        };

        if !domain.is_empty() && requester.scope() != domain {
            return Ok(AuthoritativeOutcome::Miss(MissReason::CrossScope {
                requested: domain.to_string(),
                requester_scope: requester.scope().to_string(),
            }));
        }

        let mut eps = self.lookup_by_alias(&requester, name);
        if eps.is_empty() {
            eps = self.lookup_by_name(requester.container(), name);
        }

        if eps.is_empty() {
            debug!(name = %name, "Can't find the container");
            return Ok(AuthoritativeOutcome::Miss(MissReason::NotFound(
                name.to_string(),
            )));
        }

        if eps.iter().any(|e| e.ip().is_unspecified()) {
            return Err(DomainError::UnusableEndpoint(name.to_string()));
        }

        self.shuffle(&mut eps);
        Ok(AuthoritativeOutcome::Answer(
            eps.iter().map(Endpoint::ip).collect(),
        ))
    }

    fn lookup_by_alias(&self, requester: &Endpoint, alias: &str) -> Vec<Endpoint> {
        let scope = requester.scope();

        let mut cons = self.network.containers_by_alias(&ScopedAlias::for_container(
            scope,
            requester.container().name(),
            alias,
        ));
        if cons.is_empty() {
            cons = self
                .network
                .containers_by_alias(&ScopedAlias::scope_wide(scope, alias));
        }

        cons.iter()
            .filter_map(|c| self.network.endpoint(c, scope))
            .collect()
    }

    fn lookup_by_name(&self, requester: &ContainerRef, name: &str) -> Vec<Endpoint> {
        let Some(target) = self.network.container(name) else {
            return vec![];
        };

        self.network
            .endpoints(requester)
            .iter()
            .filter_map(|ec| self.network.endpoint(&target, ec.scope()))
            .collect()
    }

    // Fisher–Yates
    fn shuffle(&self, eps: &mut [Endpoint]) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        for i in (1..eps.len()).rev() {
            let j = rng.usize(..=i);
            eps.swap(i, j);
        }
    }
}
