use anyhow::{anyhow, Result};
use dnsdouble::{Config, Shared};
use is_terminal::IsTerminal;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let mut args = std::env::args().skip(1);
    let config = config_init(args.next(), args.next())?;
    let txt_store = dnsdouble::txt_store::new_shared();

    let dns_server = dnsdouble::new_dns(config.clone(), txt_store.clone()).await?;
    tracing::info!("DNS listening on TCP {}", dns_server.local_addr()?);
    match config.address_override {
        dnsdouble::AddressOverride::HostsFile => {
            tracing::info!("A records from {}", config.hosts_path.display());
        }
        dnsdouble::AddressOverride::Fixed(addr) => {
            tracing::info!("A records fixed to {addr}");
        }
    }
    let dns_handle = tokio::spawn(dns_server.block_until_done());

    let api_server = dnsdouble::new_http(config.clone(), txt_store)?;
    tracing::info!("API listening on {}", api_server.local_addr());
    let api_handle = tokio::spawn(api_server);

    // Shutdown is abrupt: in-flight queries and updates are dropped.
    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("quitting from signal");
        },
        Ok(dns_res) = dns_handle => {
            dns_res?;
        }
        Ok(api_res) = api_handle => {
            api_res?;
        }
    }
    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_ansi(std::io::stdout().is_terminal()))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dnsdouble=info,tower_http=info".into()),
        )
        .init();
}

fn config_init(config_file: Option<String>, extra: Option<String>) -> Result<Shared> {
    if extra.is_some() {
        return Err(anyhow!("usage: dnsdouble [/path/to/config.json]"));
    }
    let config = match config_file {
        None => Config::default(),
        Some(config_file) => {
            tracing::debug!("loaded config from {config_file}");
            Config::try_from_file(&config_file)?
        }
    };
    Ok(Arc::new(config.with_env_override()?))
}
