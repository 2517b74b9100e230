//! Dual-transport DNS listener.
//!
//! One UDP socket and one TCP listener on the same address and port, each
//! served by its own loop. Every UDP datagram and every TCP connection gets
//! its own task; nothing is kept between queries.

use super::server::DnsServerHandler;
use super::socket::{create_tcp_listener, create_udp_socket};
use super::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use dockside_dns_domain::{ClientTransport, DomainError};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const MAX_UDP_DATAGRAM: usize = 65_535;
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct DnsServer {
    udp_addr: SocketAddr,
    tcp_addr: SocketAddr,
    shutdown: CancellationToken,
    loops: JoinSet<()>,
}

impl DnsServer {
    /// Binds both sockets and starts serving. Either bind failing fails the
    /// whole start; no socket is left open.
    ///
    /// With port 0 the TCP listener takes the port the kernel picked for UDP.
    pub fn start(
        addr: SocketAddr,
        interface: Option<&str>,
        handler: DnsServerHandler,
    ) -> Result<Self, DomainError> {
        let udp = create_udp_socket(addr, interface)?;
        let udp_addr = udp
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))?;

        let tcp = create_tcp_listener(SocketAddr::new(addr.ip(), udp_addr.port()), interface)?;
        let tcp_addr = tcp
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))?;

        let shutdown = CancellationToken::new();
        let handler = Arc::new(handler);
        let mut loops = JoinSet::new();
        loops.spawn(run_udp(Arc::new(udp), handler.clone(), shutdown.clone()));
        loops.spawn(run_tcp(tcp, handler, shutdown.clone()));

        info!(udp = %udp_addr, tcp = %tcp_addr, interface = ?interface, "DNS server listening");

        Ok(Self {
            udp_addr,
            tcp_addr,
            shutdown,
            loops,
        })
    }

    pub fn udp_local_addr(&self) -> SocketAddr {
        self.udp_addr
    }

    pub fn tcp_local_addr(&self) -> SocketAddr {
        self.tcp_addr
    }

    /// Asks both loops to exit. In-flight queries finish on their own.
    pub fn stop(&self) {
        info!("Stopping DNS server");
        self.shutdown.cancel();
    }

    /// Resolves once both loops have exited.
    pub async fn wait(mut self) {
        while let Some(joined) = self.loops.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "DNS server loop panicked");
            }
        }
        info!("DNS server stopped");
    }
}

async fn run_udp(socket: Arc<UdpSocket>, handler: Arc<DnsServerHandler>, shutdown: CancellationToken) {
    let mut buf = vec![0u8; MAX_UDP_DATAGRAM];

    loop {
        let (len, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = socket.recv_from(&mut buf) => match received {
                Ok(received) => received,
                Err(e) => {
                    debug!(error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let query = buf[..len].to_vec();
        let socket = socket.clone();
        let handler = handler.clone();
        tokio::spawn(async move {
            let Some(response) = handler.handle_raw(&query, peer, ClientTransport::Udp).await
            else {
                return;
            };
            if let Err(e) = socket.send_to(&response, peer).await {
                error!(client = %peer, error = %e, "Failed to send UDP response");
            }
        });
    }

    debug!("UDP loop exited");
}

async fn run_tcp(listener: TcpListener, handler: Arc<DnsServerHandler>, shutdown: CancellationToken) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "TCP accept error");
                    continue;
                }
            },
        };

        tokio::spawn(serve_tcp_connection(
            stream,
            peer,
            handler.clone(),
            shutdown.clone(),
        ));
    }

    debug!("TCP loop exited");
}

async fn serve_tcp_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
) {
    loop {
        let query = tokio::select! {
            _ = shutdown.cancelled() => break,
            read = tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut stream)) => match read {
                Ok(Ok(query)) => query,
                Ok(Err(e)) => {
                    if e.kind() != io::ErrorKind::UnexpectedEof {
                        debug!(client = %peer, error = %e, "TCP read error");
                    }
                    break;
                }
                Err(_) => {
                    debug!(client = %peer, "Closing idle TCP connection");
                    break;
                }
            },
        };

        let Some(response) = handler.handle_raw(&query, peer, ClientTransport::Tcp).await else {
            continue;
        };
        if let Err(e) = send_with_length_prefix(&mut stream, &response).await {
            error!(client = %peer, error = %e, "Failed to send TCP response");
            break;
        }
    }
}
