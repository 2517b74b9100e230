#![allow(dead_code)]

use async_trait::async_trait;
use dockside_dns_application::ports::{
    question_key, CacheStats, NetworkContext, ResponseCache, UpstreamForwarder,
};
use dockside_dns_domain::{
    ClientTransport, ContainerRef, DomainError, Endpoint, QuestionKey, ScopedAlias,
};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn build_query(name: &str, record_type: RecordType, id: u16) -> Message {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(Name::from_str(name).unwrap(), record_type));
    message
}

pub fn build_query_with_edns(name: &str, record_type: RecordType, id: u16, size: u16) -> Message {
    let mut message = build_query(name, record_type, id);
    let mut edns = Edns::new();
    edns.set_max_payload(size);
    message.set_edns(edns);
    message
}

// ── Network graph ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockNetworkContext {
    endpoints: Vec<Endpoint>,
    by_scope: HashMap<(String, String), Endpoint>,
    aliases: HashMap<ScopedAlias, Vec<ContainerRef>>,
}

impl MockNetworkContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, container: &str, scope: &str, ip: &str) -> Self {
        let endpoint = Endpoint::new(ContainerRef::new(container), scope, ip.parse().unwrap());
        self.by_scope
            .insert((container.to_string(), scope.to_string()), endpoint.clone());
        self.endpoints.push(endpoint);
        self
    }

    pub fn with_alias(mut self, alias: ScopedAlias, container: &str) -> Self {
        self.aliases
            .entry(alias)
            .or_default()
            .push(ContainerRef::new(container));
        self
    }

    /// requester `172.16.0.2` and `foo` at `172.16.0.3`, both on `bridge`
    pub fn bridge_pair() -> Self {
        Self::new()
            .with_endpoint("requester", "bridge", "172.16.0.2")
            .with_endpoint("foo", "bridge", "172.16.0.3")
    }
}

impl NetworkContext for MockNetworkContext {
    fn container_by_addr(&self, addr: IpAddr) -> Option<Endpoint> {
        self.endpoints
            .iter()
            .find(|e| IpAddr::V4(e.ip()) == addr)
            .cloned()
    }

    fn containers_by_alias(&self, alias: &ScopedAlias) -> Vec<ContainerRef> {
        self.aliases.get(alias).cloned().unwrap_or_default()
    }

    fn container(&self, name: &str) -> Option<ContainerRef> {
        self.endpoints
            .iter()
            .find(|e| e.container().name() == name)
            .map(|e| e.container().clone())
    }

    fn endpoint(&self, container: &ContainerRef, scope: &str) -> Option<Endpoint> {
        self.by_scope
            .get(&(container.name().to_string(), scope.to_string()))
            .cloned()
    }

    fn endpoints(&self, container: &ContainerRef) -> Vec<Endpoint> {
        self.endpoints
            .iter()
            .filter(|e| e.container() == container)
            .cloned()
            .collect()
    }
}

// ── Cache ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockResponseCache {
    entries: Mutex<HashMap<QuestionKey, Message>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    adds: AtomicUsize,
}

impl MockResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preload(&self, response: Message) {
        let key = question_key(&response.queries()[0]);
        self.entries.lock().unwrap().insert(key, response);
    }

    pub fn adds(&self) -> usize {
        self.adds.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl ResponseCache for MockResponseCache {
    fn get(&self, key: &QuestionKey) -> Option<Message> {
        let found = self.entries.lock().unwrap().get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        } else {
            self.misses.fetch_add(1, Ordering::SeqCst);
        }
        found
    }

    fn add(&self, response: &Message) {
        self.adds.fetch_add(1, Ordering::SeqCst);
        if let Some(query) = response.queries().first() {
            self.entries
                .lock()
                .unwrap()
                .entry(question_key(query))
                .or_insert_with(|| response.clone());
        }
    }

    fn remove(&self, key: &QuestionKey) {
        self.entries.lock().unwrap().remove(key);
    }

    fn reset(&self) {
        self.entries.lock().unwrap().clear();
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::SeqCst) as u64,
            misses: self.misses.load(Ordering::SeqCst) as u64,
            insertions: self.adds.load(Ordering::SeqCst) as u64,
            evictions: 0,
        }
    }
}

// ── Upstream ───────────────────────────────────────────────────────────────

enum Behaviour {
    Answer(Ipv4Addr),
    Fail(DomainError),
}

pub struct MockUpstreamForwarder {
    behaviour: Behaviour,
    calls: AtomicUsize,
    transports: Mutex<Vec<ClientTransport>>,
}

impl MockUpstreamForwarder {
    pub fn answering(ip: &str) -> Self {
        Self {
            behaviour: Behaviour::Answer(ip.parse().unwrap()),
            calls: AtomicUsize::new(0),
            transports: Mutex::new(vec![]),
        }
    }

    pub fn failing(error: DomainError) -> Self {
        Self {
            behaviour: Behaviour::Fail(error),
            calls: AtomicUsize::new(0),
            transports: Mutex::new(vec![]),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn transports(&self) -> Vec<ClientTransport> {
        self.transports.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamForwarder for MockUpstreamForwarder {
    async fn forward(
        &self,
        request: &Message,
        transport: ClientTransport,
    ) -> Result<Message, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.transports.lock().unwrap().push(transport);

        match &self.behaviour {
            Behaviour::Fail(e) => Err(e.clone()),
            Behaviour::Answer(ip) => {
                let mut response = Message::new();
                response
                    .set_id(request.id())
                    .set_message_type(MessageType::Response)
                    .set_recursion_available(true)
                    .add_queries(request.queries().to_vec());
                let name = request.queries()[0].name().clone();
                response.add_answer(Record::from_rdata(name, 300, RData::A(A(*ip))));
                Ok(response)
            }
        }
    }
}
