//! Listener socket construction.

use dockside_dns_domain::DomainError;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, UdpSocket};

const TCP_BACKLOG: i32 = 1024;

pub(crate) fn create_udp_socket(
    addr: SocketAddr,
    interface: Option<&str>,
) -> Result<UdpSocket, DomainError> {
    let build = || -> io::Result<UdpSocket> {
        let socket = Socket::new(domain_for(addr), Type::DGRAM, Some(Protocol::UDP))?;
        prepare(&socket, addr, interface)?;
        socket.bind(&addr.into())?;
        socket.set_nonblocking(true)?;
        UdpSocket::from_std(socket.into())
    };
    build().map_err(|e| bind_failed("udp", addr, e))
}

pub(crate) fn create_tcp_listener(
    addr: SocketAddr,
    interface: Option<&str>,
) -> Result<TcpListener, DomainError> {
    let build = || -> io::Result<TcpListener> {
        let socket = Socket::new(domain_for(addr), Type::STREAM, Some(Protocol::TCP))?;
        prepare(&socket, addr, interface)?;
        socket.bind(&addr.into())?;
        socket.listen(TCP_BACKLOG)?;
        socket.set_nonblocking(true)?;
        TcpListener::from_std(socket.into())
    };
    build().map_err(|e| bind_failed("tcp", addr, e))
}

fn domain_for(addr: SocketAddr) -> Domain {
    if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    }
}

fn prepare(socket: &Socket, addr: SocketAddr, interface: Option<&str>) -> io::Result<()> {
    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    if let Some(interface) = interface {
        bind_to_interface(socket, interface);
    }
    Ok(())
}

// Failures are logged; the socket still listens on every interface.
#[cfg(any(target_os = "android", target_os = "fuchsia", target_os = "linux"))]
fn bind_to_interface(socket: &Socket, interface: &str) {
    match socket.bind_device(Some(interface.as_bytes())) {
        Ok(()) => tracing::info!(interface, "Bound socket to interface"),
        Err(e) => tracing::error!(interface, error = %e, "Failed to bind socket to interface"),
    }
}

#[cfg(not(any(target_os = "android", target_os = "fuchsia", target_os = "linux")))]
fn bind_to_interface(_socket: &Socket, interface: &str) {
    tracing::warn!(interface, "Binding to an interface is not supported on this platform");
}

fn bind_failed(transport: &'static str, addr: SocketAddr, e: io::Error) -> DomainError {
    DomainError::BindFailed {
        transport,
        addr: addr.to_string(),
        reason: e.to_string(),
    }
}
