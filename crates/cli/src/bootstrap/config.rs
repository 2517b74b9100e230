use dockside_dns_domain::{CliOverrides, Config};
use dockside_dns_infrastructure::system::discover_nameservers;
use tracing::warn;

/// Loads and validates the configuration. An empty nameserver list is
/// filled from the system resolver configuration.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let mut config = Config::load(path, overrides)?;

    if config.dns.nameservers.is_empty() {
        config.dns.nameservers = discover_nameservers();
    }

    config.validate()?;
    Ok(config)
}

/// Called once logging is up, so that an unusable setup is at least visible.
pub fn report_config_warnings(config: &Config) {
    if config.dns.nameservers.is_empty() {
        warn!("No nameservers configured or discovered; forwarded queries will fail");
    }
    if config.server.interface.is_some() && !config.server.listen_ip.is_empty() {
        warn!(
            listen_ip = %config.server.listen_ip,
            "Interface ignored because a listen address is set"
        );
    }
}
