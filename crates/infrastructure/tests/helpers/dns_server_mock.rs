#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

#[derive(Clone, Copy)]
enum Reply {
    Answer(Ipv4Addr),
    Rcode(ResponseCode),
}

/// Upstream nameserver on 127.0.0.1 answering over UDP and TCP on the same
/// port, counting every exchange.
pub struct MockDnsServer {
    addr: SocketAddr,
    exchanges: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    /// Answers every question with one A record.
    pub async fn answering(ip: &str) -> Self {
        Self::start(Reply::Answer(ip.parse().unwrap())).await
    }

    /// Answers every question with an empty response carrying `rcode`.
    pub async fn failing_with(rcode: ResponseCode) -> Self {
        Self::start(Reply::Rcode(rcode)).await
    }

    async fn start(reply: Reply) -> Self {
        let udp = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = udp.local_addr().unwrap();
        let tcp = TcpListener::bind(addr).await.unwrap();
        let exchanges = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let counter = exchanges.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = udp.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            let response = Self::build_mock_response(&buf[..len], reply);
                            let _ = udp.send_to(&response, peer).await;
                        }
                    }
                    accepted = tcp.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            let counter = counter.clone();
                            tokio::spawn(async move {
                                let mut len_buf = [0u8; 2];
                                if stream.read_exact(&mut len_buf).await.is_err() {
                                    return;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                counter.fetch_add(1, Ordering::SeqCst);
                                let response = Self::build_mock_response(&query, reply);
                                let _ = stream.write_all(&(response.len() as u16).to_be_bytes()).await;
                                let _ = stream.write_all(&response).await;
                            });
                        }
                    }
                }
            }
        });

        Self {
            addr,
            exchanges,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    fn build_mock_response(query: &[u8], reply: Reply) -> Vec<u8> {
        let request = Message::from_vec(query).unwrap();

        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_recursion_desired(request.recursion_desired())
            .set_recursion_available(true)
            .add_queries(request.queries().to_vec());

        match reply {
            Reply::Answer(ip) => {
                let name = request.queries()[0].name().clone();
                response.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
            }
            Reply::Rcode(rcode) => {
                response.set_response_code(rcode);
            }
        }

        response.to_vec().unwrap()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
