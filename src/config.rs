use crate::error::Error;
use ipnetwork::IpNetwork;
use lazy_static::lazy_static;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, DurationMilliSeconds, DurationSeconds};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub type Shared = Arc<Config>;

/// Name of the environment variable that can force every `A` answer to a single address.
pub const ADDRESS_OVERRIDE_ENV: &str = "FAKE_DNS";

/// Sentinel override value selecting the hosts file.
const HOSTS_SENTINEL: &str = "hosts";

#[serde_as]
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub dns_bind_addr: SocketAddr,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub dns_timeout: Duration,
    pub api_bind_addr: SocketAddr,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub api_timeout: Duration,
    pub hosts_path: PathBuf,
    #[serde_as(as = "DisplayFromStr")]
    pub address_override: AddressOverride,
}

/// Where `A` answers come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressOverride {
    /// Resolve through the hosts file.
    #[default]
    HostsFile,
    /// Answer every `A` query with this address.
    Fixed(Ipv4Addr),
}

lazy_static! {
    // NOTE(XXX): Once the "ip" feature has stabilized we can use Ipv6Addr.is_unique_local[0].
    //            Presently this feature is unstable so we home-roll. See also RFC 4193[1].
    // [0]: https://doc.rust-lang.org/std/net/struct.Ipv6Addr.html#method.is_unique_local
    // [1]: https://www.rfc-editor.org/rfc/rfc4193.html
    static ref IPV6_UNIQUE_LOCAL_NETWORK: IpNetwork = IpNetwork::from_str("fc00::/7").unwrap();
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dns_bind_addr: SocketAddr::from(([127, 0, 0, 1], 8053)),
            dns_timeout: Duration::from_millis(250),
            api_bind_addr: SocketAddr::from(([127, 0, 0, 1], 8055)),
            api_timeout: Duration::from_secs(5),
            hosts_path: PathBuf::from("/etc/hosts"),
            address_override: AddressOverride::default(),
        }
    }
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        conf.bind_addr_is_secure()?;
        Ok(conf)
    }

    /// Apply the [`ADDRESS_OVERRIDE_ENV`] environment variable, if set. The environment takes
    /// precedence over any value loaded from a config file.
    pub fn with_env_override(self) -> Result<Self, Error> {
        self.with_override_value(std::env::var(ADDRESS_OVERRIDE_ENV).ok().as_deref())
    }

    fn with_override_value(mut self, value: Option<&str>) -> Result<Self, Error> {
        if let Some(value) = value {
            self.address_override = value.parse()?;
        }
        Ok(self)
    }

    pub fn bind_addr_is_secure(&self) -> Result<(), Error> {
        match self.api_bind_addr {
            SocketAddr::V4(v4_addr) => {
                let ip = v4_addr.ip();
                if !ip.is_loopback() && !ip.is_private() {
                    return Err(Error::InsecureAPIBind(IpAddr::V4(*ip)));
                }
                Ok(())
            }
            SocketAddr::V6(v6_addr) => {
                let ip = v6_addr.ip();
                if !ip.is_loopback() && !IPV6_UNIQUE_LOCAL_NETWORK.contains(IpAddr::V6(*ip)) {
                    return Err(Error::InsecureAPIBind(IpAddr::V6(*ip)));
                }
                Ok(())
            }
        }
    }
}

impl FromStr for AddressOverride {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | HOSTS_SENTINEL => Ok(AddressOverride::HostsFile),
            addr => addr
                .parse()
                .map(AddressOverride::Fixed)
                .map_err(|_| Error::InvalidOverride(s.to_string())),
        }
    }
}

impl fmt::Display for AddressOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressOverride::HostsFile => f.write_str(HOSTS_SENTINEL),
            AddressOverride::Fixed(addr) => write!(f, "{addr}"),
        }
    }
}
