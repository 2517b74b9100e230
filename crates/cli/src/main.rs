use clap::Parser;
use dockside_dns_domain::CliOverrides;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "dockside-dns")]
#[command(version)]
#[command(about = "Dockside DNS - container name resolver and forwarding cache")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS listen port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Listen address (empty = all interfaces)
    #[arg(short = 'l', long)]
    listen_ip: Option<String>,

    /// Bind sockets to this interface when no listen address is set
    #[arg(short = 'i', long)]
    interface: Option<String>,

    /// Upstream nameserver (repeatable), e.g. 10.0.0.1 or 10.0.0.2:5353
    #[arg(short = 'n', long = "nameserver", value_name = "ADDR")]
    nameservers: Vec<String>,

    /// Per-upstream timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// TTL in seconds for container answers and cached responses
    #[arg(long)]
    ttl: Option<u32>,

    /// Maximum number of cached responses
    #[arg(long)]
    cache_size: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Verbose logging
    #[arg(short = 'd', long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        listen_ip: cli.listen_ip,
        port: cli.port,
        interface: cli.interface,
        nameservers: cli.nameservers,
        timeout_secs: cli.timeout,
        ttl_secs: cli.ttl,
        cache_capacity: cli.cache_size,
        log_level: cli.log_level,
        debug: cli.debug,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);
    bootstrap::report_config_warnings(&config);

    info!("Starting Dockside DNS v{}", env!("CARGO_PKG_VERSION"));

    let services = di::DnsServices::new(&config)?;
    server::run_dns_server(&config.server, services.handler, &services.cache).await?;

    info!("Server shutdown complete");
    Ok(())
}
