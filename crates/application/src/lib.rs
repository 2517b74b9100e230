//! Dockside DNS Application Layer
//!
//! Ports the resolver depends on and the per-query use cases built on them.
pub mod ports;
pub mod use_cases;
