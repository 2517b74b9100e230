use anyhow::Context;
use dockside_dns_application::ports::{NetworkContext, ResponseCache};
use dockside_dns_application::use_cases::HandleDnsQueryUseCase;
use dockside_dns_domain::{Config, Nameserver};
use dockside_dns_infrastructure::dns::{
    CacheOptions, DnsForwarder, DnsResponseCache, DnsServerHandler,
};
use dockside_dns_infrastructure::network::StaticNetworkContext;
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub cache: Arc<DnsResponseCache>,
    pub handler: DnsServerHandler,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let cache = Self::build_cache(config);
        let forwarder = Self::build_forwarder(config)?;
        let network = Self::build_network(config);

        let use_case = HandleDnsQueryUseCase::new(
            cache.clone() as Arc<dyn ResponseCache>,
            Arc::new(forwarder),
        )
        .with_network(network)
        .with_ttl(config.dns.ttl());

        Ok(Self {
            cache,
            handler: DnsServerHandler::new(Arc::new(use_case)),
        })
    }

    fn build_cache(config: &Config) -> Arc<DnsResponseCache> {
        let options = CacheOptions {
            capacity: config.cache.capacity,
            ttl: config.dns.ttl(),
        };
        info!(
            capacity = options.capacity,
            ttl_secs = options.ttl.as_secs(),
            "Response cache configured"
        );
        Arc::new(DnsResponseCache::new(options))
    }

    fn build_forwarder(config: &Config) -> anyhow::Result<DnsForwarder> {
        let nameservers = Nameserver::parse_list(&config.dns.nameservers)
            .context("Invalid nameserver list")?;
        info!(
            nameservers = ?nameservers.iter().map(ToString::to_string).collect::<Vec<_>>(),
            timeout_secs = config.dns.timeout_secs,
            "Upstream forwarding configured"
        );
        Ok(DnsForwarder::new(nameservers).with_timeout(config.dns.timeout()))
    }

    fn build_network(config: &Config) -> Arc<dyn NetworkContext> {
        let network = StaticNetworkContext::from_config(&config.network);
        info!(containers = network.container_count(), "Network graph loaded");
        Arc::new(network)
    }
}
