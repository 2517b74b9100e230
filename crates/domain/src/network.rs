//! Read-only views of the container network graph.
//!
//! The graph itself lives outside the resolver. These are the values the
//! resolver receives back from a `NetworkContext`: containers are identified
//! by name, endpoints tie a container to one scope (network) and carry its
//! address on that scope.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerRef {
    name: Arc<str>,
}

impl ContainerRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A container's attachment to a single scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    container: ContainerRef,
    scope: Arc<str>,
    ip: Ipv4Addr,
}

impl Endpoint {
    pub fn new(container: ContainerRef, scope: impl Into<Arc<str>>, ip: Ipv4Addr) -> Self {
        Self {
            container,
            scope: scope.into(),
            ip,
        }
    }

    pub fn container(&self) -> &ContainerRef {
        &self.container
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// May be unspecified (`0.0.0.0`) while the endpoint is still being
    /// configured.
    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }
}

/// Key of the alias index: `(scope, container-or-empty, alias)`.
///
/// A container-scoped alias is only visible to the named requesting
/// container; a scope-wide alias (no container) is visible to every
/// container on the scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopedAlias {
    scope: Arc<str>,
    container: Option<Arc<str>>,
    alias: Arc<str>,
}

impl ScopedAlias {
    pub fn scope_wide(scope: impl Into<Arc<str>>, alias: impl Into<Arc<str>>) -> Self {
        Self {
            scope: scope.into(),
            container: None,
            alias: alias.into(),
        }
    }

    pub fn for_container(
        scope: impl Into<Arc<str>>,
        container: impl Into<Arc<str>>,
        alias: impl Into<Arc<str>>,
    ) -> Self {
        let container = container.into();
        Self {
            scope: scope.into(),
            container: if container.is_empty() {
                None
            } else {
                Some(container)
            },
            alias: alias.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl fmt::Display for ScopedAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.container {
            Some(c) => write!(f, "{}:{}:{}", self.scope, c, self.alias),
            None => write!(f, "{}:{}", self.scope, self.alias),
        }
    }
}
