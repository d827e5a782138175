use std::fmt;
use std::str::FromStr;

/// Environment variable that points the harness at an already running node, as `host:port`.
pub const SCYLLA_URI_ENV: &str = "SCYLLA_URI";

/// Used when [SCYLLA_URI_ENV] is not set.
pub const DEFAULT_SCYLLA_URI: &str = "127.0.0.1:9042";

/// A reachable database endpoint.
///
/// Only valid while the provisioning scope that produced it is alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseNode {
    pub address: String,
    pub port: String,
}

impl DatabaseNode {
    pub fn new(address: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for DatabaseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

impl FromStr for DatabaseNode {
    type Err = InvalidNodeUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, port) = s.split_once(':').ok_or_else(|| InvalidNodeUriError {
            msg: format!("Expected a node URI in the form 'host:port', got '{s}'"),
        })?;
        if address.is_empty() || port.is_empty() {
            return Err(InvalidNodeUriError {
                msg: format!("Node URI '{s}' is missing a host or a port"),
            });
        }

        Ok(Self::new(address, port))
    }
}

#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct InvalidNodeUriError {
    msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_uri() {
        let node: DatabaseNode = DEFAULT_SCYLLA_URI.parse().unwrap();
        assert_eq!(node, DatabaseNode::new("127.0.0.1", "9042"));
        assert_eq!(node.to_string(), DEFAULT_SCYLLA_URI);
    }

    #[test]
    fn split_on_first_colon_only() {
        let node: DatabaseNode = "scylla:9042:extra".parse().unwrap();
        assert_eq!(node.address, "scylla");
        assert_eq!(node.port, "9042:extra");
    }

    #[test]
    fn reject_uri_without_port() {
        assert!("127.0.0.1".parse::<DatabaseNode>().is_err());
        assert!("127.0.0.1:".parse::<DatabaseNode>().is_err());
    }
}
