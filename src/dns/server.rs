use crate::config::Shared;
use crate::dns::handlers::Handler;
use crate::error::Error;
use crate::hosts::HostsResolver;
use crate::txt_store::DynTxtStore;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time;

/// A DNS server answering length-prefixed messages over TCP.
pub struct Server {
    listener: TcpListener,
    handler: Handler,
    timeout: Duration,
}

/// Bind the DNS listener described by `config`.
///
/// # Errors
///
/// Returns [`Error::IO`] if the listener can't be bound.
pub async fn new(config: Shared, txt_store: DynTxtStore) -> Result<Server, Error> {
    let hosts = Arc::new(HostsResolver::new(&config.hosts_path));
    let handler = Handler::new(&config, txt_store, hosts);
    let listener = TcpListener::bind(config.dns_bind_addr).await?;
    Ok(Server {
        listener,
        handler,
        timeout: config.dns_timeout,
    })
}

impl Server {
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the bound address can't be determined.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the task is dropped. Each connection is served on its own task.
    ///
    /// # Errors
    ///
    /// Never returns an error after a successful bind; failed accepts are logged and skipped.
    pub async fn block_until_done(self) -> Result<(), Error> {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(pair) => pair,
                Err(err) => {
                    tracing::error!("failed to accept DNS connection: {err}");
                    continue;
                }
            };
            let handler = self.handler.clone();
            let timeout = self.timeout;
            tokio::spawn(async move {
                if let Err(err) = serve_connection(stream, handler, timeout).await {
                    tracing::debug!("DNS connection from {peer} terminated: {err}");
                }
            });
        }
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    handler: Handler,
    timeout: Duration,
) -> Result<(), Error> {
    loop {
        let len = match deadline(timeout, stream.read_u16()).await {
            Ok(len) => usize::from(len),
            // Idle or closed by the client.
            Err(err)
                if matches!(err.kind(), io::ErrorKind::UnexpectedEof | io::ErrorKind::TimedOut) =>
            {
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        if len == 0 {
            continue;
        }

        let mut payload = vec![0u8; len];
        deadline(timeout, stream.read_exact(&mut payload)).await?;

        let Some(response) = handler.handle_bytes(&payload).await? else {
            continue;
        };
        let response_len = u16::try_from(response.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "DNS response too large"))?;
        deadline(timeout, async {
            stream.write_u16(response_len).await?;
            stream.write_all(&response).await?;
            stream.flush().await
        })
        .await?;
    }
}

async fn deadline<T>(
    timeout: Duration,
    fut: impl Future<Output = io::Result<T>>,
) -> io::Result<T> {
    time::timeout(timeout, fut).await.map_err(io::Error::from)?
}
