#![allow(unused_imports)]
mod builders;
mod dns_server_mock;

pub use builders::{a_records, build_query, ask_tcp, ask_udp, BlackHole};
pub use dns_server_mock::MockDnsServer;
