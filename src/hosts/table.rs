use std::collections::HashMap;
use std::net::IpAddr;
use std::time::SystemTime;

/// A parsed hosts file, tagged with the modification time of the file it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct HostsTable {
    entries: HashMap<String, Vec<IpAddr>>,
    modified: SystemTime,
}

impl HostsTable {
    /// Parse hosts file content of the form `address name [alias...]`.
    ///
    /// Blank lines, lines starting with `#` and lines whose first field isn't an IP address are
    /// skipped. Every name on a line maps to the line's address; repeated names accumulate their
    /// addresses in file order.
    #[must_use]
    pub fn parse(content: &str, modified: SystemTime) -> Self {
        let mut entries: HashMap<String, Vec<IpAddr>> = HashMap::new();
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(Ok(addr)) = fields.next().map(str::parse::<IpAddr>) else {
                tracing::trace!("skipping hosts line without a leading address: {line}");
                continue;
            };
            for name in fields {
                entries.entry(name.to_string()).or_default().push(addr);
            }
        }
        HostsTable { entries, modified }
    }

    /// The addresses listed for `name`, in file order. Names are matched case-sensitively.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Vec<IpAddr> {
        self.entries.get(name).map_or(Vec::default(), Clone::clone)
    }

    /// True if the file has been modified since this table was built.
    #[must_use]
    pub fn is_stale(&self, file_modified: SystemTime) -> bool {
        self.modified < file_modified
    }
}
