//! Redirect hop resolution.
//!
//! The HTTP client never follows redirects itself. The prober walks the chain
//! one request at a time, so every hop gets its own connect and read timeouts.

use log::warn;
use reqwest::Url;

use crate::error_handling::{ProbeError, ProbeErrorKind};

/// Statuses that are followed when they carry a `Location` header.
const REDIRECT_STATUS_CODES: &[u16] = &[301, 302, 303, 307, 308];

/// Works out where a response sends the prober next.
///
/// # Returns
///
/// `Ok(None)` when the response is final: not a redirect, or a redirect
/// without a usable `Location` header. `Ok(Some(url))` with the absolute
/// target otherwise.
///
/// # Errors
///
/// Returns an `InvalidEndpoint` failure when the target cannot be parsed or
/// leaves http/https.
pub(super) fn redirect_target(
    current: &Url,
    status: u16,
    location: Option<&str>,
) -> Result<Option<Url>, ProbeError> {
    if !REDIRECT_STATUS_CODES.contains(&status) {
        return Ok(None);
    }
    let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) else {
        warn!("Redirect status {} for {} but no Location header", status, current);
        return Ok(None);
    };

    let target = current.join(location).map_err(|e| {
        ProbeError::network(
            ProbeErrorKind::InvalidEndpoint,
            format!("bad redirect target {location:?}: {e}"),
        )
    })?;
    match target.scheme() {
        "http" | "https" => Ok(Some(target)),
        scheme => Err(ProbeError::network(
            ProbeErrorKind::InvalidEndpoint,
            format!("redirect to unsupported scheme {scheme:?}"),
        )),
    }
}
