//! Error types.

use std::net::IpAddr;
use trust_dns_proto::error::ProtoError;

/// Error enumerates the possible DNS double error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when a record is published through the
    /// [`/set-txt` API endpoint][crate::api#set-txt-post] (or directly with
    /// [`TxtStore::add_txt`][`crate::txt_store::TxtStore::add_txt`]) without a `host`.
    #[error("host must not be empty")]
    InvalidRequest,

    /// Returned when the A record override (the `FAKE_DNS` environment variable or the
    /// [`Config::address_override`][`crate::config::Config::address_override`] setting) is
    /// neither `hosts` nor an IPv4 address.
    #[error("address override must be \"hosts\" or an IPv4 address, not \"{0}\"")]
    InvalidOverride(String),

    /// Returned when the [`Config::api_bind_addr`][`crate::config::Config::api_bind_addr`] is
    /// not a loopback address, or an address within a private network space. The control API
    /// lets anyone who can reach it change DNS answers, so it must never face a public network.
    #[error("API bind address ({0}) must be a loopback or private IP")]
    InsecureAPIBind(IpAddr),

    /// Returned when a generic IO error occurs, e.g. the hosts file exists but can't be read.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when [trying to load a `Config`][crate::config::Config::try_from_file], or a
    /// [`/set-txt`][crate::api#set-txt-post] request body, fails due to invalid JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),

    /// Returned when the control API server can't bind its listener.
    #[error("HTTP server error")]
    HTTPError(#[from] hyper::Error),

    /// Returned when the DNS server encounters a generic DNS protocol error.
    #[error("DNS error")]
    DNSError(#[from] ProtoError),
}
