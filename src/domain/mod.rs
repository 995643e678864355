//! Domain normalization and candidate preparation.
//!
//! Raw input values become canonical hosts here, before anything is scheduled.
//!
//! Key functions:
//! - `normalize_domain()` - Canonicalizes one raw value or rejects it
//! - `prepare_candidates()` - Normalizes an ordered input, honouring a cap
//! - `build_endpoint()` - Joins a canonical host with a protocol

mod endpoint;

pub use endpoint::{build_endpoint, Endpoint, Protocol};

use log::debug;
use serde::Serialize;

/// Shortest canonical host accepted.
const MIN_HOST_LENGTH: usize = 3;

/// Normalizes a raw candidate into a canonical host.
///
/// Steps: coerce to string, trim, lower-case, strip one leading `http://` or
/// `https://`, then reject anything shorter than three characters or without a
/// `.`. Nothing beyond that heuristic is validated; a malformed host that
/// passes will simply fail when probed.
///
/// # Returns
///
/// `Some(host)` for an acceptable candidate, `None` otherwise.
pub fn normalize_domain(raw: impl ToString) -> Option<String> {
    let lowered = raw.to_string().trim().to_lowercase();
    let host = lowered
        .strip_prefix("http://")
        .or_else(|| lowered.strip_prefix("https://"))
        .unwrap_or(&lowered);

    if is_plausible_host(host) {
        Some(host.to_string())
    } else {
        None
    }
}

/// The minimal shape check shared by the normalizer and the endpoint builder.
pub(crate) fn is_plausible_host(host: &str) -> bool {
    host.chars().count() >= MIN_HOST_LENGTH && host.contains('.')
}

/// A raw input value that survived normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCandidate {
    /// Position among the scheduled domains (0-based)
    pub index: usize,
    /// Position of the raw value in the input (0-based)
    pub row: usize,
    /// The value exactly as supplied
    pub original: String,
    /// Canonical host used for probing
    pub host: String,
}

/// Result of preparing an ordered input for scheduling.
#[derive(Debug, Clone, Default)]
pub struct CandidateBatch {
    /// Valid candidates in input order
    pub candidates: Vec<DomainCandidate>,
    /// Every raw value in the input, including rows past the cap
    pub rows_read: usize,
    /// Raw values rejected by normalization
    pub dropped: usize,
}

/// Normalizes raw input values in order.
///
/// Invalid values are dropped silently (logged at debug level). When
/// `max_domains` is set, only the first that many valid domains are kept;
/// later rows are still counted in `rows_read` but never normalized.
pub fn prepare_candidates<I, T>(raw: I, max_domains: Option<usize>) -> CandidateBatch
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    let mut batch = CandidateBatch::default();

    for (row, value) in raw.into_iter().enumerate() {
        batch.rows_read += 1;
        if max_domains.is_some_and(|max| batch.candidates.len() >= max) {
            continue;
        }
        let original = value.to_string();
        match normalize_domain(&original) {
            Some(host) => {
                batch.candidates.push(DomainCandidate {
                    index: batch.candidates.len(),
                    row,
                    original,
                    host,
                });
            }
            None => {
                debug!("Dropping invalid domain candidate at row {}: {:?}", row, original);
                batch.dropped += 1;
            }
        }
    }

    batch
}
