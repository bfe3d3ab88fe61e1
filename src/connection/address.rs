//! Server address parsing and resolution.

use std::{fmt, net::SocketAddr, str::FromStr};

use thiserror::Error;

use super::ConnectionError;

/// Where to connect: a literal socket address or a host name to resolve.
///
/// # Examples
///
/// ```
/// use streamframe::connection::ServerAddress;
///
/// let ip: ServerAddress = "127.0.0.1:7000".parse().expect("valid address");
/// assert!(matches!(ip, ServerAddress::Ip(_)));
///
/// let named: ServerAddress = "game.example.com:7000".parse().expect("valid address");
/// assert_eq!(named.to_string(), "game.example.com:7000");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ServerAddress {
    /// A literal IPv4 or IPv6 socket address.
    Ip(SocketAddr),
    /// A host name resolved at connect time.
    Domain {
        /// Host name.
        host: String,
        /// TCP port.
        port: u16,
    },
}

/// Errors parsing a `host:port` string.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AddressParseError {
    /// No `:port` suffix.
    #[error("missing port in {0:?}")]
    MissingPort(String),
    /// The port is not a number in `0..=65535`.
    #[error("invalid port in {0:?}")]
    InvalidPort(String),
    /// Nothing before the `:port` suffix.
    #[error("empty host")]
    EmptyHost,
}

impl ServerAddress {
    /// Resolve to a single socket address.
    ///
    /// Host names go through the system resolver; the first address
    /// returned wins.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Resolve`] if the lookup fails and
    /// [`ConnectionError::NoAddress`] if it returns nothing.
    pub async fn resolve(&self) -> Result<SocketAddr, ConnectionError> {
        match self {
            Self::Ip(addr) => Ok(*addr),
            Self::Domain { host, port } => {
                let mut addrs = tokio::net::lookup_host((host.as_str(), *port))
                    .await
                    .map_err(|source| ConnectionError::Resolve {
                        host: host.clone(),
                        source,
                    })?;
                let addr = addrs
                    .next()
                    .ok_or_else(|| ConnectionError::NoAddress(host.clone()))?;
                tracing::debug!(%host, %addr, "resolved server address");
                Ok(addr)
            }
        }
    }
}

impl From<SocketAddr> for ServerAddress {
    fn from(addr: SocketAddr) -> Self { Self::Ip(addr) }
}

impl FromStr for ServerAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(Self::Ip(addr));
        }
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| AddressParseError::MissingPort(s.to_owned()))?;
        if host.is_empty() {
            return Err(AddressParseError::EmptyHost);
        }
        let port = port
            .parse()
            .map_err(|_| AddressParseError::InvalidPort(s.to_owned()))?;
        Ok(Self::Domain {
            host: host.to_owned(),
            port,
        })
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(addr) => fmt::Display::fmt(addr, f),
            Self::Domain { host, port } => write!(f, "{host}:{port}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::v4("10.0.0.1:80", ServerAddress::Ip(SocketAddr::from(([10, 0, 0, 1], 80))))]
    #[case::v6("[::1]:9000", ServerAddress::Ip(SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 1], 9000))))]
    #[case::domain("localhost:7000", ServerAddress::Domain { host: "localhost".into(), port: 7000 })]
    fn parses_valid_addresses(#[case] input: &str, #[case] expected: ServerAddress) {
        assert_eq!(input.parse::<ServerAddress>(), Ok(expected));
    }

    #[rstest]
    #[case::no_port("localhost", AddressParseError::MissingPort("localhost".into()))]
    #[case::bad_port("localhost:http", AddressParseError::InvalidPort("localhost:http".into()))]
    #[case::port_range("localhost:70000", AddressParseError::InvalidPort("localhost:70000".into()))]
    #[case::no_host(":80", AddressParseError::EmptyHost)]
    fn rejects_invalid_addresses(#[case] input: &str, #[case] expected: AddressParseError) {
        assert_eq!(input.parse::<ServerAddress>(), Err(expected));
    }

    #[tokio::test]
    async fn literal_address_resolves_without_lookup() {
        let addr = SocketAddr::from(([127, 0, 0, 1], 4000));
        let resolved = ServerAddress::from(addr)
            .resolve()
            .await
            .expect("literal address");
        assert_eq!(resolved, addr);
    }
}
