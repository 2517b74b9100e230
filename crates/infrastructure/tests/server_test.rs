mod helpers;

use dockside_dns_application::ports::ResponseCache;
use dockside_dns_application::use_cases::HandleDnsQueryUseCase;
use dockside_dns_domain::{ClientTransport, DomainError, Nameserver};
use dockside_dns_infrastructure::dns::{
    CacheOptions, DnsForwarder, DnsResponseCache, DnsServer, DnsServerHandler,
};
use dockside_dns_infrastructure::network::StaticNetworkContext;
use helpers::{a_records, ask_tcp, ask_udp, build_query, MockDnsServer};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RecordType;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    server: DnsServer,
    cache: Arc<DnsResponseCache>,
    upstream: MockDnsServer,
}

/// Test clients connect from 127.0.0.1, which the graph places on `bridge`
/// next to `foo`.
async fn harness() -> Harness {
    let upstream = MockDnsServer::answering("93.184.216.34").await;
    let cache = Arc::new(DnsResponseCache::new(CacheOptions {
        capacity: 128,
        ttl: Duration::from_secs(600),
    }));
    let forwarder = DnsForwarder::new(vec![Nameserver::from(upstream.addr())])
        .with_timeout(Duration::from_millis(500));
    let network = StaticNetworkContext::builder()
        .endpoint("requester", "bridge", Ipv4Addr::LOCALHOST)
        .endpoint("foo", "bridge", Ipv4Addr::new(172, 16, 0, 3))
        .build();

    let use_case = HandleDnsQueryUseCase::new(cache.clone(), Arc::new(forwarder))
        .with_network(Arc::new(network))
        .with_ttl(Duration::from_secs(600));
    let handler = DnsServerHandler::new(Arc::new(use_case));
    let server = DnsServer::start("127.0.0.1:0".parse().unwrap(), None, handler).unwrap();

    Harness {
        server,
        cache,
        upstream,
    }
}

fn wire(name: &str, record_type: RecordType, id: u16) -> Vec<u8> {
    build_query(name, record_type, id).to_vec().unwrap()
}

#[tokio::test]
async fn test_udp_and_tcp_share_the_port() {
    let h = harness().await;

    assert_eq!(h.server.udp_local_addr(), h.server.tcp_local_addr());
}

#[tokio::test]
async fn test_container_name_over_udp() {
    let h = harness().await;

    let bytes = ask_udp(h.server.udp_local_addr(), &wire("foo.", RecordType::A, 0x0101))
        .await
        .unwrap();
    let response = Message::from_vec(&bytes).unwrap();

    assert_eq!(response.id(), 0x0101);
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert!(response.authoritative());
    assert!(response.recursion_available());
    assert_eq!(a_records(&response), vec![Ipv4Addr::new(172, 16, 0, 3)]);
    assert_eq!(response.answers()[0].ttl(), 600);
    assert_eq!(h.upstream.exchanges(), 0);
}

#[tokio::test]
async fn test_container_name_over_tcp() {
    let h = harness().await;

    let bytes = ask_tcp(h.server.tcp_local_addr(), &wire("foo.bridge.", RecordType::A, 9)).await;
    let response = Message::from_vec(&bytes).unwrap();

    assert_eq!(response.id(), 9);
    assert_eq!(a_records(&response), vec![Ipv4Addr::new(172, 16, 0, 3)]);
}

#[tokio::test]
async fn test_cache_hit_preserves_client_id() {
    let h = harness().await;
    let addr = h.server.udp_local_addr();

    let first = ask_udp(addr, &wire("example.com.", RecordType::A, 0x1111))
        .await
        .unwrap();
    let second = ask_udp(addr, &wire("example.com.", RecordType::A, 0x2222))
        .await
        .unwrap();

    let first = Message::from_vec(&first).unwrap();
    let second = Message::from_vec(&second).unwrap();
    assert_eq!(first.id(), 0x1111);
    assert_eq!(second.id(), 0x2222);
    assert_eq!(a_records(&second), vec![Ipv4Addr::new(93, 184, 216, 34)]);
    assert_eq!(h.upstream.exchanges(), 1);
    assert_eq!(h.cache.stats().hits, 1);
}

#[tokio::test]
async fn test_cross_scope_name_is_forwarded() {
    let h = harness().await;

    let bytes = ask_udp(h.server.udp_local_addr(), &wire("foo.other.", RecordType::A, 5))
        .await
        .unwrap();
    let response = Message::from_vec(&bytes).unwrap();

    assert!(!response.authoritative());
    assert_eq!(a_records(&response), vec![Ipv4Addr::new(93, 184, 216, 34)]);
    assert_eq!(h.upstream.exchanges(), 1);
}

#[tokio::test]
async fn test_any_query_is_not_implemented() {
    let h = harness().await;

    let bytes = ask_udp(h.server.udp_local_addr(), &wire("example.com.", RecordType::ANY, 6))
        .await
        .unwrap();
    let response = Message::from_vec(&bytes).unwrap();

    assert_eq!(response.id(), 6);
    assert_eq!(response.response_code(), ResponseCode::NotImp);
    assert!(response.answers().is_empty());
    assert_eq!(h.upstream.exchanges(), 0);
}

#[tokio::test]
async fn test_malformed_request_gets_format_error() {
    let h = harness().await;
    // header claims one question, body ends inside the first label
    let garbage = [0xbe, 0xef, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0x03, b'f'];

    let bytes = ask_udp(h.server.udp_local_addr(), &garbage).await.unwrap();
    let response = Message::from_vec(&bytes).unwrap();

    assert_eq!(response.id(), 0xbeef);
    assert_eq!(response.response_code(), ResponseCode::FormErr);
}

#[tokio::test]
async fn test_runt_packet_is_dropped() {
    let h = harness().await;

    let reply = ask_udp(h.server.udp_local_addr(), &[0x01, 0x02, 0x03]).await;

    assert!(reply.is_none());
}

#[tokio::test]
async fn test_handler_without_sockets() {
    let cache = Arc::new(DnsResponseCache::default());
    let forwarder = Arc::new(DnsForwarder::new(vec![]));
    let handler = DnsServerHandler::new(Arc::new(HandleDnsQueryUseCase::new(cache, forwarder)));
    let client: SocketAddr = "127.0.0.1:5353".parse().unwrap();

    let bytes = handler
        .handle_raw(&wire("example.com.", RecordType::A, 3), client, ClientTransport::Udp)
        .await
        .unwrap();
    let response = Message::from_vec(&bytes).unwrap();

    assert_eq!(response.response_code(), ResponseCode::ServFail);
    assert_eq!(response.id(), 3);
}

#[tokio::test]
async fn test_stop_then_wait_returns() {
    let h = harness().await;

    h.server.stop();
    let waited = tokio::time::timeout(Duration::from_secs(2), h.server.wait()).await;

    assert!(waited.is_ok());
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let taken = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let addr = taken.local_addr().unwrap();
    let handler = DnsServerHandler::new(Arc::new(HandleDnsQueryUseCase::new(
        Arc::new(DnsResponseCache::default()),
        Arc::new(DnsForwarder::new(vec![])),
    )));

    let result = DnsServer::start(addr, None, handler);

    assert!(matches!(
        result,
        Err(DomainError::BindFailed { transport: "udp", .. })
    ));
}

#[tokio::test]
async fn test_tcp_bind_failure_releases_udp_socket() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = taken.local_addr().unwrap();
    let handler = DnsServerHandler::new(Arc::new(HandleDnsQueryUseCase::new(
        Arc::new(DnsResponseCache::default()),
        Arc::new(DnsForwarder::new(vec![])),
    )));

    let result = DnsServer::start(addr, None, handler);

    assert!(matches!(
        result,
        Err(DomainError::BindFailed { transport: "tcp", .. })
    ));
    assert!(std::net::UdpSocket::bind(addr).is_ok());
}
