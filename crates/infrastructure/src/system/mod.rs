pub mod resolv_conf;

pub use resolv_conf::{discover_nameservers, discover_nameservers_from, parse_resolv_conf};
