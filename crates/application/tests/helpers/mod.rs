mod mock_ports;

pub use mock_ports::{
    build_query, build_query_with_edns, MockNetworkContext, MockResponseCache,
    MockUpstreamForwarder,
};
