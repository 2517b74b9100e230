use dockside_dns_application::ports::ResponseCache;
use dockside_dns_domain::config::ServerConfig;
use dockside_dns_infrastructure::dns::{DnsResponseCache, DnsServer, DnsServerHandler};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::info;

/// Serves until Ctrl-C or SIGTERM, then shuts down and logs cache stats.
pub async fn run_dns_server(
    config: &ServerConfig,
    handler: DnsServerHandler,
    cache: &DnsResponseCache,
) -> anyhow::Result<()> {
    let ip = if config.listen_ip.is_empty() {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        config.listen_ip.parse()?
    };
    let addr = SocketAddr::new(ip, config.port);

    let server = DnsServer::start(addr, config.bind_interface(), handler)?;

    shutdown_signal().await?;
    server.stop();
    server.wait().await;

    let stats = cache.stats();
    info!(
        entries = stats.entries,
        hits = stats.hits,
        misses = stats.misses,
        insertions = stats.insertions,
        evictions = stats.evictions,
        hit_rate = stats.hit_rate(),
        "Cache statistics"
    );
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = terminate.recv() => {}
    }
    info!("Shutdown signal received");
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    Ok(())
}
