//! Error categorization and retry strategy.
//!
//! This module maps transport errors onto probe failure categories and
//! configures the retry timing of the probe client.

use std::error::Error as StdError;
use std::io::ErrorKind as IoErrorKind;
use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use super::types::ProbeErrorKind;
use crate::config::{
    RETRYABLE_STATUS_CODES, RETRY_BACKOFF_BASE, RETRY_BACKOFF_FACTOR_MS, RETRY_MAX_DELAY_SECS,
};

/// Creates the backoff schedule for transient failures.
///
/// Yields `retries` delays: 1s, 2s, 4s, ... capped at `RETRY_MAX_DELAY_SECS`.
/// With the default of one retry the iterator yields a single 1s delay.
pub fn get_retry_strategy(retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_BACKOFF_BASE)
        .factor(RETRY_BACKOFF_FACTOR_MS)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(retries)
}

/// Whether a response status is retried before being accepted.
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status)
}

/// Renders an error and every source beneath it as one line.
pub fn error_chain_message(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Categorizes a `reqwest::Error` into a `ProbeErrorKind`.
///
/// reqwest's own flags are checked first, then the source chain is searched for
/// an `std::io::Error` with a telling kind, and finally the rendered chain is
/// matched against the messages hyper and rustls produce for DNS and TLS
/// failures.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ProbeErrorKind {
    if error.is_timeout() {
        return ProbeErrorKind::Timeout;
    }
    if error.is_builder() {
        return ProbeErrorKind::InvalidEndpoint;
    }
    if error.is_redirect() {
        return ProbeErrorKind::TooManyRedirects;
    }

    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            match io_err.kind() {
                IoErrorKind::ConnectionRefused => return ProbeErrorKind::ConnectionRefused,
                IoErrorKind::ConnectionReset
                | IoErrorKind::ConnectionAborted
                | IoErrorKind::BrokenPipe
                | IoErrorKind::UnexpectedEof => return ProbeErrorKind::ConnectionReset,
                IoErrorKind::TimedOut => return ProbeErrorKind::Timeout,
                _ => {}
            }
        }
        source = cause.source();
    }

    categorize_message(&error_chain_message(error), error.is_connect())
}

/// Message-based fallback for errors whose source chain carries no io kind.
fn categorize_message(message: &str, is_connect: bool) -> ProbeErrorKind {
    let msg = message.to_lowercase();
    if msg.contains("dns error")
        || msg.contains("failed to lookup address")
        || msg.contains("name or service not known")
        || msg.contains("no such host")
    {
        ProbeErrorKind::DnsFailure
    } else if msg.contains("certificate") || msg.contains("tls") || msg.contains("handshake") {
        ProbeErrorKind::TlsFailure
    } else if msg.contains("connection refused") {
        ProbeErrorKind::ConnectionRefused
    } else if msg.contains("connection reset") || msg.contains("connection closed") {
        ProbeErrorKind::ConnectionReset
    } else if msg.contains("timed out") {
        ProbeErrorKind::Timeout
    } else if is_connect {
        ProbeErrorKind::ConnectFailure
    } else {
        ProbeErrorKind::RequestFailure
    }
}
