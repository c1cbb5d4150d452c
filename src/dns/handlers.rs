use crate::config::Config;
use crate::dns::answers::{self, Answer, Synthesizer};
use crate::error::Error;
use crate::hosts::HostsResolver;
use crate::txt_store::DynTxtStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use trust_dns_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use trust_dns_proto::rr::RecordType;
use trust_dns_proto::serialize::binary::{BinEncodable, BinEncoder};

/// Answers DNS messages. Each message is handled independently of every other.
#[derive(Clone)]
pub struct Handler {
    synthesizers: Arc<HashMap<RecordType, Box<dyn Synthesizer>>>,
}

impl Handler {
    pub fn new(config: &Config, txt_store: DynTxtStore, hosts: Arc<HostsResolver>) -> Self {
        let mut synthesizers: HashMap<RecordType, Box<dyn Synthesizer>> = HashMap::new();
        synthesizers.insert(
            RecordType::A,
            Box::new(answers::Address::new(config.address_override, hosts)),
        );
        synthesizers.insert(RecordType::MX, Box::new(answers::MailExchange));
        synthesizers.insert(RecordType::TXT, Box::new(answers::Text::new(txt_store)));
        synthesizers.insert(RecordType::CAA, Box::new(answers::Authorization));
        Handler {
            synthesizers: Arc::new(synthesizers),
        }
    }

    /// Decode a wire-format request and return the wire-format response.
    ///
    /// Returns `Ok(None)` if the request can't be decoded; there is nothing to reply to. A
    /// response too large to encode is replaced by a header-only `SERVFAIL`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DNSError`] if not even the `SERVFAIL` header can be encoded.
    pub async fn handle_bytes(&self, request: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        let request = match Message::from_vec(request) {
            Ok(request) => request,
            Err(err) => {
                debug!("dropping undecodable DNS message: {err}");
                return Ok(None);
            }
        };
        let response = self.handle_message(&request).await;
        match encode(&response) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) => {
                warn!("failed to encode response to message {}: {err}", request.id());
                let servfail =
                    Message::error_msg(request.id(), request.op_code(), ResponseCode::ServFail);
                Ok(Some(encode(&servfail)?))
            }
        }
    }

    /// Build the response to a request. Every question is echoed and answered on its own; one
    /// unanswerable `A` question marks the response `SERVFAIL` without stopping the others.
    pub async fn handle_message(&self, request: &Message) -> Message {
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(request.op_code())
            .set_authoritative(true)
            .set_recursion_desired(request.recursion_desired());

        // If it isn't a query, return NOTIMPL.
        if request.op_code() != OpCode::Query || request.message_type() != MessageType::Query {
            response.set_response_code(ResponseCode::NotImp);
            return response;
        }

        response.add_queries(request.queries().iter().cloned());
        for query in request.queries() {
            debug!("query -- [{}] {}", query.name(), query.query_type());
            match self.answer(query).await {
                Answer::Records(records) => {
                    response.add_answers(records);
                }
                Answer::ServFail => {
                    response.set_response_code(ResponseCode::ServFail);
                }
            }
        }
        response.add_name_server(answers::authority());
        response
    }

    async fn answer(&self, query: &Query) -> Answer {
        let Some(synthesizer) = self.synthesizers.get(&query.query_type()) else {
            return Answer::Records(Vec::default());
        };
        match synthesizer.synthesize(query).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(
                    "failed to answer {} query for \"{}\": {err}",
                    query.query_type(),
                    query.name()
                );
                Answer::ServFail
            }
        }
    }
}

/// Encode a message without name compression.
fn encode(message: &Message) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::with_capacity(512);
    {
        let mut encoder = BinEncoder::new(&mut buf);
        encoder.set_canonical_names(true);
        message.emit(&mut encoder)?;
    }
    Ok(buf)
}
