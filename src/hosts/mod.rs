//! Static address resolution from a hosts file.
//!
//! The file is re-read whenever its modification time moves past the one recorded for the
//! cached table. Container runtimes rewrite `/etc/hosts` as networks are attached, so the cache
//! must never outlive a change to the file.

use crate::error::Error;
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::sync::RwLock;

mod table;

pub use table::HostsTable;

/// Resolves names against a hosts file, caching the parsed table until the file changes.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct HostsResolver {
    path: PathBuf,
    cache: RwLock<Option<HostsTable>>,
}

impl HostsResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HostsResolver {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the addresses listed for `name` in the hosts file, in file order.
    ///
    /// A missing hosts file is not an error: it resolves nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the hosts file exists but can't be inspected or read.
    pub async fn resolve_static(&self, name: &str) -> Result<Vec<IpAddr>, Error> {
        let Some(modified) = self.file_modified().await? else {
            return Ok(Vec::default());
        };

        if let Some(table) = self.cache.read().await.as_ref() {
            if !table.is_stale(modified) {
                return Ok(table.lookup(name));
            }
        }

        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::default()),
            Err(err) => return Err(Error::IO(err)),
        };
        let table = HostsTable::parse(&content, modified);
        let addrs = table.lookup(name);
        tracing::debug!("reloaded hosts file {}", self.path.display());
        *self.cache.write().await = Some(table);
        Ok(addrs)
    }

    async fn file_modified(&self) -> Result<Option<SystemTime>, Error> {
        match fs::metadata(&self.path).await {
            Ok(meta) => Ok(Some(meta.modified()?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::IO(err)),
        }
    }
}
