use super::exchange::{DnsRequest, DnsResponse, ResponseSource};
use super::resolve_container::{AuthoritativeOutcome, ContainerResolver};
use super::responses;
use crate::ports::{question_key, NetworkContext, ResponseCache, UpstreamForwarder};
use dockside_dns_domain::DomainError;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{DNSClass, RecordType};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

const DEFAULT_TTL_SECS: u32 = 600;

/// Per-query pipeline: validate, answer authoritatively, serve from cache,
/// forward. Steps run strictly in that order and the first one that produces
/// a response wins.
pub struct HandleDnsQueryUseCase {
    cache: Arc<dyn ResponseCache>,
    forwarder: Arc<dyn UpstreamForwarder>,
    authority: Option<ContainerResolver>,
    ttl: u32,
}

impl HandleDnsQueryUseCase {
    pub fn new(cache: Arc<dyn ResponseCache>, forwarder: Arc<dyn UpstreamForwarder>) -> Self {
        Self {
            cache,
            forwarder,
            authority: None,
            ttl: DEFAULT_TTL_SECS,
        }
    }

    pub fn with_network(self, network: Arc<dyn NetworkContext>) -> Self {
        self.with_resolver(ContainerResolver::new(network))
    }

    pub fn with_resolver(mut self, resolver: ContainerResolver) -> Self {
        self.authority = Some(resolver);
        self
    }

    /// TTL carried by authoritative answers.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = u32::try_from(ttl.as_secs()).unwrap_or(u32::MAX);
        self
    }

    /// Returns `None` only when the response could not be encoded.
    pub async fn execute(&self, request: &DnsRequest) -> Option<DnsResponse> {
        let message = &request.message;
        let budget = request
            .transport
            .payload_budget(responses::edns_payload(message));

        if message.queries().len() != 1 {
            error!(
                id = message.id(),
                questions = message.queries().len(),
                "Rejected multi-question query"
            );
            return self.reject(request, ResponseCode::ServFail);
        }
        let query = &message.queries()[0];

        if query.query_class() != DNSClass::IN {
            error!(class = ?query.query_class(), "Rejected non-inet query");
            return self.reject(request, ResponseCode::NotImp);
        }

        if query.query_type() == RecordType::ANY {
            error!(name = %query.name(), "Rejected ANY query");
            return self.reject(request, ResponseCode::NotImp);
        }

        if query.query_type() == RecordType::A {
            if let Some(resolver) = &self.authority {
                match resolver.resolve(&query.name().to_ascii(), request.client_ip) {
                    Ok(AuthoritativeOutcome::Answer(addresses)) => {
                        debug!(
                            name = %query.name(),
                            client = %request.client_ip,
                            answers = addresses.len(),
                            "Authoritative answer"
                        );
                        let (reply, answers) = responses::authoritative_answer(
                            message,
                            query.name(),
                            &addresses,
                            self.ttl,
                        );
                        return self.finish(
                            responses::encode_trimmed(reply, answers, budget, request.transport),
                            ResponseSource::Authoritative,
                        );
                    }
                    Ok(AuthoritativeOutcome::Miss(reason)) => {
                        debug!(name = %query.name(), reason = ?reason, "Not answered authoritatively");
                    }
                    Err(e) => {
                        error!(name = %query.name(), error = %e, "Authoritative lookup failed");
                    }
                }
            }
        }

        let key = question_key(query);
        if let Some(mut cached) = self.cache.get(&key) {
            debug!(key = %key, "Cache hit");
            cached.set_id(message.id()).set_truncated(false);
            return self.finish(
                responses::encode_relayed(cached, budget),
                ResponseSource::Cache,
            );
        }

        match self.forwarder.forward(message, request.transport).await {
            Ok(mut response) => {
                self.cache.add(&response);
                response.set_id(message.id());
                self.finish(
                    responses::encode_relayed(response, budget),
                    ResponseSource::Upstream,
                )
            }
            Err(DomainError::NoNameservers) => {
                error!("No nameservers defined, can not forward");
                self.reject(request, ResponseCode::ServFail)
            }
            Err(e) => {
                error!(key = %key, error = %e, "Failure to forward request");
                self.reject(request, ResponseCode::ServFail)
            }
        }
    }

    fn reject(&self, request: &DnsRequest, code: ResponseCode) -> Option<DnsResponse> {
        let reply = responses::error_reply(&request.message, code);
        self.finish(responses::encode(&reply), ResponseSource::Rejected(code))
    }

    fn finish(
        &self,
        encoded: Result<Vec<u8>, DomainError>,
        source: ResponseSource,
    ) -> Option<DnsResponse> {
        match encoded {
            Ok(bytes) => Some(DnsResponse::new(bytes, source)),
            Err(e) => {
                error!(error = %e, source = ?source, "Failed to encode response");
                None
            }
        }
    }
}
