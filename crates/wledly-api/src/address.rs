// Device address parsing
//
// Controllers are stored as the raw string the user typed ("wled.lan",
// "192.168.1.50:8080"). This module turns that into host + port without
// ever rejecting input: anything that doesn't parse as a port stays part
// of the host.

use std::fmt;
use std::str::FromStr;

use url::Url;

/// Port WLED serves its JSON API on unless told otherwise.
pub const DEFAULT_PORT: u16 = 80;

/// A controller's network location, normalized from a raw address string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress {
    host: String,
    port: u16,
}

impl DeviceAddress {
    /// Parse a raw `host` or `host:port` string.
    ///
    /// A trailing `:N` with `1 <= N <= 65535` becomes the port. Anything
    /// else, including a leading `[` (IPv6 literal), leaves the whole
    /// trimmed input as the host and uses [`DEFAULT_PORT`].
    pub fn parse(raw: &str) -> Self {
        let input = raw.trim();

        if !input.starts_with('[') {
            if let Some((host, port)) = input.rsplit_once(':') {
                if let Ok(port) = port.parse::<u16>() {
                    if port > 0 && !host.is_empty() {
                        return Self {
                            host: host.to_owned(),
                            port,
                        };
                    }
                }
            }
        }

        Self {
            host: input.to_owned(),
            port: DEFAULT_PORT,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Canonical comparison key: lower-cased host with the port always
    /// spelled out, so `WLED.lan` and `wled.lan:80` collide.
    pub fn normalized(&self) -> String {
        format!("{}:{}", self.host.to_lowercase(), self.port)
    }

    /// `http://{host}:{port}/`
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}:{}/", self.host, self.port))
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for DeviceAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plain_host_uses_default_port() {
        let addr = DeviceAddress::parse("192.168.1.50");
        assert_eq!(addr.host(), "192.168.1.50");
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn explicit_port_overrides_default() {
        let addr = DeviceAddress::parse("192.168.1.50:8080");
        assert_eq!(addr.host(), "192.168.1.50");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn boundary_ports() {
        assert_eq!(DeviceAddress::parse("wled.lan:1").port(), 1);
        assert_eq!(DeviceAddress::parse("wled.lan:65535").port(), 65535);
    }

    #[test]
    fn malformed_port_keeps_whole_input_as_host() {
        for raw in ["wled.lan:abc", "wled.lan:0", "wled.lan:70000", "wled.lan:"] {
            let addr = DeviceAddress::parse(raw);
            assert_eq!(addr.host(), raw, "input {raw}");
            assert_eq!(addr.port(), DEFAULT_PORT, "input {raw}");
        }
    }

    #[test]
    fn ipv6_literal_is_not_split() {
        let addr = DeviceAddress::parse("[fe80::1]");
        assert_eq!(addr.host(), "[fe80::1]");
        assert_eq!(addr.port(), DEFAULT_PORT);

        let addr = DeviceAddress::parse("[fe80::1]:8080");
        assert_eq!(addr.host(), "[fe80::1]:8080");
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let addr = DeviceAddress::parse("  wled.lan:81 ");
        assert_eq!(addr.host(), "wled.lan");
        assert_eq!(addr.port(), 81);
    }

    #[test]
    fn normalized_ignores_case_and_default_port() {
        let a = DeviceAddress::parse("WLED.lan");
        let b = DeviceAddress::parse("wled.lan:80");
        assert_eq!(a.normalized(), b.normalized());
        assert_ne!(a.normalized(), DeviceAddress::parse("wled.lan:81").normalized());
    }

    #[test]
    fn base_url_includes_port() {
        let url = DeviceAddress::parse("192.168.1.50").base_url().unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.50/");

        let url = DeviceAddress::parse("192.168.1.50:8080").base_url().unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.50:8080/");
    }
}
