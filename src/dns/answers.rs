use crate::config::AddressOverride;
use crate::error::Error;
use crate::hosts::HostsResolver;
use crate::txt_store::DynTxtStore;
use lazy_static::lazy_static;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;
use trust_dns_proto::op::Query;
use trust_dns_proto::rr::rdata::{CAA, MX, SOA, TXT};
use trust_dns_proto::rr::{Name, RData, Record};

/// Synthesized records are never meant to be cached by clients.
const TTL: u32 = 0;

const MX_PREFERENCE: u16 = 10;

/// RFC 1035 §3.3: a character-string is a length octet followed by that many octets.
const MAX_CHARACTER_STRING: usize = 255;

lazy_static! {
    static ref CAA_FORBIDDEN_NAME: Name = Name::from_str("bad-caa-reserved.com.").unwrap();
    static ref CAA_PERMITTED_NAME: Name = Name::from_str("good-caa-reserved.com.").unwrap();
    static ref CAA_FORBIDDEN_ISSUER: Name = Name::from_str("sad-hacker-ca.invalid").unwrap();
    static ref CAA_PERMITTED_ISSUER: Name = Name::from_str("happy-hacker-ca.invalid").unwrap();
    static ref AUTHORITY: Record = Record::from_rdata(
        Name::from_str("boulder.invalid.").unwrap(),
        TTL,
        RData::SOA(SOA::new(
            Name::from_str("ns.boulder.invalid.").unwrap(),
            Name::from_str("master.boulder.invalid.").unwrap(),
            1,
            1,
            1,
            1,
            1,
        )),
    );
}

/// The outcome of answering a single question.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Answer {
    /// Zero or more answer records. An empty list leaves the question unanswered.
    Records(Vec<Record>),
    /// The question can't be answered; the whole response carries `SERVFAIL`.
    ServFail,
}

/// Builds the answer for one question of a particular record type.
#[async_trait::async_trait]
pub(super) trait Synthesizer: Send + Sync {
    async fn synthesize(&self, query: &Query) -> Result<Answer, Error>;
}

/// The fixed SOA record placed in the authority section of every response.
pub(super) fn authority() -> Record {
    AUTHORITY.clone()
}

fn answer(query: &Query, rdata: RData) -> Answer {
    Answer::Records(vec![Record::from_rdata(query.name().clone(), TTL, rdata)])
}

/// `A`: a fixed override address, or the first IPv4 address from the hosts file.
pub(super) struct Address {
    address_override: AddressOverride,
    hosts: Arc<HostsResolver>,
}

impl Address {
    pub(super) fn new(address_override: AddressOverride, hosts: Arc<HostsResolver>) -> Self {
        Address {
            address_override,
            hosts,
        }
    }
}

#[async_trait::async_trait]
impl Synthesizer for Address {
    async fn synthesize(&self, query: &Query) -> Result<Answer, Error> {
        let addr = match self.address_override {
            AddressOverride::Fixed(addr) => addr,
            AddressOverride::HostsFile => {
                let name = query.name().to_ascii();
                let name = name.trim_end_matches('.');
                let first_v4 = self
                    .hosts
                    .resolve_static(name)
                    .await?
                    .into_iter()
                    .find_map(|ip| match ip {
                        IpAddr::V4(ipv4_addr) => Some(ipv4_addr),
                        IpAddr::V6(_) => None,
                    });
                match first_v4 {
                    Some(addr) => addr,
                    None => {
                        tracing::warn!(
                            "no IPv4 address for \"{name}\" in {}",
                            self.hosts.path().display()
                        );
                        return Ok(Answer::ServFail);
                    }
                }
            }
        };
        Ok(answer(query, RData::A(addr)))
    }
}

/// `MX`: always `10 mail.<name>`.
pub(super) struct MailExchange;

#[async_trait::async_trait]
impl Synthesizer for MailExchange {
    async fn synthesize(&self, query: &Query) -> Result<Answer, Error> {
        let exchange = Name::from_str("mail")?.append_domain(query.name())?;
        Ok(answer(query, RData::MX(MX::new(MX_PREFERENCE, exchange))))
    }
}

/// `TXT`: the value published for the query name, looked up exactly as received.
pub(super) struct Text {
    txt_store: DynTxtStore,
}

impl Text {
    pub(super) fn new(txt_store: DynTxtStore) -> Self {
        Text { txt_store }
    }
}

#[async_trait::async_trait]
impl Synthesizer for Text {
    async fn synthesize(&self, query: &Query) -> Result<Answer, Error> {
        let key = query.name().to_ascii();
        let value = self.txt_store.read().await.get_txt(&key).await;
        Ok(match value {
            Some(value) => answer(query, RData::TXT(TXT::new(character_strings(&value)))),
            None => Answer::Records(Vec::default()),
        })
    }
}

/// Split `value` into character-strings of at most 255 bytes, never inside a UTF-8 sequence.
fn character_strings(value: &str) -> Vec<String> {
    let mut strings = Vec::new();
    let mut current = String::new();
    for c in value.chars() {
        if current.len() + c.len_utf8() > MAX_CHARACTER_STRING {
            strings.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    strings.push(current);
    strings
}

/// `CAA`: fixed `issue` records for the two reserved test domains, nothing for anything else.
pub(super) struct Authorization;

#[async_trait::async_trait]
impl Synthesizer for Authorization {
    async fn synthesize(&self, query: &Query) -> Result<Answer, Error> {
        let issuer = if *query.name() == *CAA_FORBIDDEN_NAME {
            &*CAA_FORBIDDEN_ISSUER
        } else if *query.name() == *CAA_PERMITTED_NAME {
            &*CAA_PERMITTED_ISSUER
        } else {
            return Ok(Answer::Records(Vec::default()));
        };
        let caa = CAA::new_issue(false, Some(issuer.clone()), Vec::default());
        Ok(answer(query, RData::CAA(caa)))
    }
}
