use std::net::IpAddr;
use std::path::Path;
use tracing::{debug, warn};

pub const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";

/// resolv(5) limit.
const MAX_NAMESERVERS: usize = 3;

/// Nameservers from the system resolver configuration, in file order.
pub fn discover_nameservers() -> Vec<String> {
    discover_nameservers_from(RESOLV_CONF_PATH)
}

/// An unreadable file yields an empty list.
pub fn discover_nameservers_from(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let servers = parse_resolv_conf(&contents);
            debug!(path = %path.display(), ?servers, "Discovered nameservers");
            servers
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read resolver configuration");
            Vec::new()
        }
    }
}

/// Collects `nameserver` entries whose value is an IP literal; hostnames
/// are skipped since resolving them would need DNS.
pub fn parse_resolv_conf(contents: &str) -> Vec<String> {
    let mut servers = Vec::new();

    for line in contents.lines() {
        if line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        if fields.next() != Some("nameserver") {
            continue;
        }
        let Some(value) = fields.next() else {
            continue;
        };

        if value.parse::<IpAddr>().is_ok() {
            servers.push(value.to_string());
            if servers.len() == MAX_NAMESERVERS {
                break;
            }
        }
    }

    servers
}
