//! Dynamic TXT record storage.
//!
//! Holds a single TXT value per hostname, published through the [control API][crate::api] and
//! served by the [DNS responder][crate::dns]. Publishing again for the same hostname replaces
//! the previous value. Nothing expires: values live until overwritten or the process exits.
//!
//! Hostnames are normalized on write (lowercased, fully qualified) but looked up exactly as
//! given. The DNS responder looks up the query name as it arrived on the wire, so a `TXT` query
//! that uses any upper-case letters never matches a published value.

use crate::error::Error;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod memory;

#[allow(clippy::module_name_repetitions)]
pub use memory::InMemoryTxtStore;

/// `DynTxtStore` is a type alias for a [`TxtStore`] that can be used by multiple read/write
/// consumers that coordinate through an [`Arc`] and a [`RwLock`] wrapping the [`TxtStore`].
///
/// Any number of lookups may hold the read lock together; a publish holds the write lock for the
/// duration of the map update only.
#[allow(clippy::module_name_repetitions)]
pub type DynTxtStore = Arc<RwLock<dyn TxtStore + Send + Sync>>;

/// An async trait describing dynamic storage of TXT record values, keyed by the hostname they
/// should be served for in the [DNS responder][crate::dns].
#[async_trait::async_trait]
pub trait TxtStore {
    /// Publish a TXT record value for the given host, replacing any earlier value. Returns the
    /// normalized key the value was stored under.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if `host` is empty.
    async fn add_txt(&mut self, host: &str, value: String) -> Result<String, Error>;

    /// Get the TXT record value for exactly the given key (if any).
    async fn get_txt(&self, host: &str) -> Option<String>;
}

/// Normalize a hostname into the key form used by the store: lowercase, with a trailing dot.
///
/// Returns `None` for an empty hostname.
#[must_use]
pub fn normalize_host(host: &str) -> Option<String> {
    if host.is_empty() {
        return None;
    }
    let mut key = host.to_lowercase();
    if !key.ends_with('.') {
        key.push('.');
    }
    Some(key)
}

/// Create an empty, shareable in-memory store.
#[must_use]
pub fn new_shared() -> DynTxtStore {
    Arc::new(RwLock::new(InMemoryTxtStore::default()))
}
