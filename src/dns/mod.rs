//! Synthetic authoritative DNS server.
//!
//! Answers queries over TCP (two-byte length-prefixed messages, see [RFC-1035 §4.2.2][tcp]).
//! Every question in a message is answered independently, by record type:
//!
//! # A
//!
//! When the `FAKE_DNS` environment variable (or
//! [`Config::address_override`][`crate::config::Config::address_override`]) holds an IPv4
//! address, every `A` query is answered with it. Otherwise the query name, minus its trailing
//! dot, is looked up in the [hosts file][crate::hosts] and the first IPv4 address listed for it
//! is returned. A name the hosts file doesn't know sets `SERVFAIL` on the response while the
//! remaining questions are still answered.
//!
//! ```bash
//! ❯ FAKE_DNS=10.77.77.77 dnsdouble &
//! ❯ dig @127.0.0.1 -p 8053 +tcp +short example.com A
//! 10.77.77.77
//! ```
//!
//! # MX
//!
//! Always answered with preference `10` and the exchange `mail.<query name>`.
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 8053 +tcp +short example.org MX
//! 10 mail.example.org.
//! ```
//!
//! # TXT
//!
//! Answered with the value most recently published for the name through the
//! [`/set-txt` API endpoint][crate::api#set-txt-post], if any. Published hosts are lowercased,
//! but the query name is used as received: a query spelled with upper-case letters finds
//! nothing.
//!
//! ```bash
//! ❯ curl --json '{"host":"_acme-challenge.example.com","value":"token"}' \
//!    http://localhost:8055/set-txt
//! ❯ dig @127.0.0.1 -p 8053 +tcp +short _acme-challenge.example.com TXT
//! "token"
//! ```
//!
//! # CAA
//!
//! Two reserved test domains have fixed `issue` records:
//!
//! | Name | Value |
//! |---|---|
//! | `bad-caa-reserved.com.` | `sad-hacker-ca.invalid` |
//! | `good-caa-reserved.com.` | `happy-hacker-ca.invalid` |
//!
//! Any other name has no `CAA` records.
//!
//! # Everything else
//!
//! Other record types get no answer; the question is still echoed.
//!
//! # Authority
//!
//! Every response carries one SOA record in the authority section:
//!
//! ```text
//! boulder.invalid. 0 IN SOA ns.boulder.invalid. master.boulder.invalid. 1 1 1 1 1
//! ```
//!
//! Responses are encoded without name compression.
//!
//! [tcp]: https://www.rfc-editor.org/rfc/rfc1035#section-4.2.2

mod answers;
mod handlers;
pub mod server;

pub use handlers::Handler;
pub use server::{new, Server};
