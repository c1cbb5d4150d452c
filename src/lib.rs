//! DNS double
//!
//! A test-double authoritative name server for exercising domain validation end to end without
//! a real DNS zone.
//!
//! A test harness publishes TXT record values over a small [HTTP API][crate::api]; the
//! [DNS server][crate::dns] answers live `A`, `MX`, `TXT` and `CAA` queries with synthetic
//! records built from those values, a [hosts file][crate::hosts], and a few fixed rules. It is
//! well suited to [RFC-8555][RFC-8555] [DNS-01] challenge tests.
//!
//! [RFC-8555]: https://www.rfc-editor.org/rfc/rfc8555
//! [DNS-01]: https://www.rfc-editor.org/rfc/rfc8555#section-8.4
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod config;
pub mod dns;
pub mod error;
pub mod hosts;
pub mod txt_store;

pub use api::new as new_http;
pub use config::{AddressOverride, Config, Shared};
pub use dns::new as new_dns;
pub use hosts::HostsResolver;
pub use txt_store::InMemoryTxtStore;
