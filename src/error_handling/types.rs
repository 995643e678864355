//! Error type definitions.
//!
//! This module defines the initialization errors and the probe failure
//! categories used throughout the prober.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Categories of probe failures.
///
/// The label of a category is the leading token of every failure description
/// the probe client produces (`"<label>: <detail>"`), so error-pattern
/// histograms group by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ProbeErrorKind {
    /// Connect, send or receive exceeded the timeout budget
    Timeout,
    /// The remote host actively refused the TCP connection
    ConnectionRefused,
    /// The connection was reset mid-exchange
    ConnectionReset,
    /// Name resolution failed
    DnsFailure,
    /// TLS handshake or certificate validation failed
    TlsFailure,
    /// Any other connect-phase failure (unreachable network, etc.)
    ConnectFailure,
    /// Redirect chain exceeded the hop limit or looped
    TooManyRedirects,
    /// The endpoint could not be turned into a request
    InvalidEndpoint,
    /// Anything reqwest reports that fits no other category
    RequestFailure,
    /// The orchestration itself panicked
    Internal,
}

impl std::fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProbeErrorKind {
    /// Stable label; never contains a `:`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeErrorKind::Timeout => "Request timeout",
            ProbeErrorKind::ConnectionRefused => "Connection refused",
            ProbeErrorKind::ConnectionReset => "Connection reset",
            ProbeErrorKind::DnsFailure => "DNS resolution failed",
            ProbeErrorKind::TlsFailure => "TLS handshake failed",
            ProbeErrorKind::ConnectFailure => "Connection failed",
            ProbeErrorKind::TooManyRedirects => "Too many redirects",
            ProbeErrorKind::InvalidEndpoint => "Invalid endpoint",
            ProbeErrorKind::RequestFailure => "Request failed",
            ProbeErrorKind::Internal => "Internal error",
        }
    }

    /// Whether a failure of this kind earns another try.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProbeErrorKind::Timeout
                | ProbeErrorKind::ConnectionRefused
                | ProbeErrorKind::ConnectionReset
        )
    }
}

/// A failed single try inside the probe client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// No response was received.
    #[error("{kind}: {detail}")]
    Network {
        /// Failure category
        kind: ProbeErrorKind,
        /// Underlying error text
        detail: String,
    },

    /// A response arrived with a status worth retrying. Once retries are
    /// exhausted it is accepted as a reachable answer.
    #[error("Retryable status: {0}")]
    RetryableStatus(u16),
}

impl ProbeError {
    /// Builds a network failure of the given kind.
    pub fn network(kind: ProbeErrorKind, detail: impl Into<String>) -> Self {
        ProbeError::Network {
            kind,
            detail: detail.into(),
        }
    }

    /// Whether this try should be repeated.
    pub fn is_transient(&self) -> bool {
        match self {
            ProbeError::Network { kind, .. } => kind.is_transient(),
            ProbeError::RetryableStatus(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_probe_error_kind_as_str() {
        assert_eq!(ProbeErrorKind::Timeout.as_str(), "Request timeout");
        assert_eq!(
            ProbeErrorKind::ConnectionRefused.as_str(),
            "Connection refused"
        );
        assert_eq!(
            ProbeErrorKind::DnsFailure.as_str(),
            "DNS resolution failed"
        );
    }

    #[test]
    fn test_all_kinds_have_colon_free_labels() {
        for kind in ProbeErrorKind::iter() {
            let label = kind.as_str();
            assert!(!label.is_empty(), "{:?} should have a label", kind);
            assert!(!label.contains(':'), "{:?} label must not contain ':'", kind);
        }
    }

    #[test]
    fn test_transient_kinds() {
        let transient: Vec<ProbeErrorKind> = ProbeErrorKind::iter()
            .filter(|k| k.is_transient())
            .collect();
        assert_eq!(
            transient,
            vec![
                ProbeErrorKind::Timeout,
                ProbeErrorKind::ConnectionRefused,
                ProbeErrorKind::ConnectionReset,
            ]
        );
    }

    #[test]
    fn test_probe_error_display_leads_with_label() {
        let err = ProbeError::network(ProbeErrorKind::DnsFailure, "no such host");
        assert_eq!(err.to_string(), "DNS resolution failed: no such host");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_retryable_status_is_transient() {
        assert!(ProbeError::RetryableStatus(503).is_transient());
        assert!(ProbeError::network(ProbeErrorKind::Timeout, "slow").is_transient());
    }
}
