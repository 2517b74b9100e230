//! Dockside DNS Infrastructure Layer
//!
//! Concrete adapters behind the application ports: the response cache,
//! upstream transports and forwarder, the dual-transport listener, the
//! static network graph and resolv.conf discovery.
pub mod dns;
pub mod network;
pub mod system;
