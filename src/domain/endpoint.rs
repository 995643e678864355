//! Endpoint construction from canonical hosts.

use serde::Serialize;
use strum_macros::EnumIter;

use super::is_plausible_host;

/// Scheme a domain is probed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// Plain HTTP, always tried first
    Http,
    /// HTTPS, tried only after HTTP failed
    Https,
}

impl Protocol {
    /// URL scheme (`http` / `https`).
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// Display label used in reports (`HTTP` / `HTTPS`).
    pub fn label(&self) -> &'static str {
        match self {
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A host paired with the protocol it is probed over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Endpoint {
    /// Probe protocol
    pub protocol: Protocol,
    /// Canonical host
    pub host: String,
}

impl Endpoint {
    /// `"<scheme>://<host>"`
    pub fn url(&self) -> String {
        format!("{}://{}", self.protocol.scheme(), self.host)
    }

    /// Parses the endpoint into a `url::Url` for the HTTP client.
    pub fn to_url(&self) -> Result<url::Url, url::ParseError> {
        url::Url::parse(&self.url())
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.protocol.scheme(), self.host)
    }
}

/// Builds the endpoint for a canonical host.
///
/// Re-applies the normalizer's length and dot check and returns `None` when the
/// host fails it.
pub fn build_endpoint(host: &str, protocol: Protocol) -> Option<Endpoint> {
    if !is_plausible_host(host) {
        return None;
    }
    Some(Endpoint {
        protocol,
        host: host.to_string(),
    })
}
