//! Building and sizing response messages.
//!
//! Every response leaves through one of the `encode_*` functions so that its
//! wire length never exceeds the payload budget of the client's transport.

use dockside_dns_domain::{ClientTransport, DomainError};
use hickory_proto::op::{Edns, Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use std::net::Ipv4Addr;

/// UDP payload size advertised in the request's OPT record.
pub fn edns_payload(request: &Message) -> Option<u16> {
    request.extensions().as_ref().map(Edns::max_payload)
}

/// Reply header and question section mirroring `request`.
pub fn reply_to(request: &Message) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_checking_disabled(request.checking_disabled())
        .add_queries(request.queries().to_vec());
    reply
}

pub fn error_reply(request: &Message, code: ResponseCode) -> Message {
    let mut reply = reply_to(request);
    reply.set_response_code(code);
    reply
}

/// FormErr for a request too damaged to decode; only the ID survives.
pub fn format_error(id: u16) -> Result<Vec<u8>, DomainError> {
    let mut reply = Message::new();
    reply
        .set_id(id)
        .set_message_type(MessageType::Response)
        .set_response_code(ResponseCode::FormErr);
    encode(&reply)
}

/// Authoritative answer: AA and RA set, one A record per address.
pub fn authoritative_answer(
    request: &Message,
    qname: &Name,
    addresses: &[Ipv4Addr],
    ttl: u32,
) -> (Message, Vec<Record>) {
    let mut reply = reply_to(request);
    reply.set_authoritative(true).set_recursion_available(true);

    if request.extensions().is_some() {
        let mut edns = Edns::new();
        edns.set_max_payload(ClientTransport::Udp.payload_budget(edns_payload(request)) as u16);
        reply.set_edns(edns);
    }

    let answers = addresses
        .iter()
        .map(|ip| Record::from_rdata(qname.clone(), ttl, RData::A(A(*ip))))
        .collect();

    (reply, answers)
}

/// Encodes `reply` with as many of `answers` as fit in `budget`, dropping
/// records from the tail. On TCP a trimmed response carries TC; on UDP it
/// does not.
pub fn encode_trimmed(
    mut reply: Message,
    mut answers: Vec<Record>,
    budget: usize,
    transport: ClientTransport,
) -> Result<Vec<u8>, DomainError> {
    let mut trimmed = false;
    loop {
        let mut candidate = reply.clone();
        candidate.insert_answers(answers.clone());
        let fitting = match encode(&candidate) {
            Ok(bytes) if bytes.len() <= budget || answers.is_empty() => Some(bytes),
            Ok(_) => None,
            Err(e) if answers.is_empty() => return Err(e),
            // the encoder refuses messages past 64KiB
            Err(_) => None,
        };

        if let Some(bytes) = fitting {
            if trimmed && transport.is_tcp() {
                reply.set_truncated(true);
                reply.insert_answers(answers);
                return encode(&reply);
            }
            return Ok(bytes);
        }
        answers.pop();
        trimmed = true;
    }
}

/// Encodes a cached or forwarded response. If it does not fit the budget,
/// the record sections are dropped and TC is set so the client retries over
/// TCP.
pub fn encode_relayed(mut response: Message, budget: usize) -> Result<Vec<u8>, DomainError> {
    let bytes = encode(&response)?;
    if bytes.len() <= budget {
        return Ok(bytes);
    }

    response.take_answers();
    response.take_name_servers();
    response.take_additionals();
    response.set_truncated(true);
    encode(&response)
}

pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    message
        .to_vec()
        .map_err(|e| DomainError::EncodeFailed(e.to_string()))
}
