//! Single-endpoint probing.
//!
//! A probe makes one bounded-timeout request against one endpoint (retrying
//! transient failures internally) and reports a `ProbeAttempt`. The `Prober`
//! trait is the seam between the fallback orchestration and the network:
//! `HttpProber` is the reqwest-backed implementation used by real runs.

mod client;
mod redirects;

pub use client::HttpProber;

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::Endpoint;

/// How a probe attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    /// A response was received, whatever its status.
    Reachable {
        /// HTTP status of the final response
        status_code: u16,
    },
    /// No response was received.
    Unreachable {
        /// `"<category>: <detail>"` description
        error: String,
    },
}

/// One completed probe of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    /// Endpoint that was probed
    pub endpoint: Endpoint,
    /// Final result after any retries
    pub result: AttemptResult,
    /// Wall time from the first try to the final answer, retries included
    pub elapsed: Duration,
    /// Extra tries that were performed
    pub retries: usize,
}

impl ProbeAttempt {
    /// An attempt that received a response.
    pub fn reachable(endpoint: Endpoint, status_code: u16, elapsed: Duration, retries: usize) -> Self {
        Self {
            endpoint,
            result: AttemptResult::Reachable { status_code },
            elapsed,
            retries,
        }
    }

    /// An attempt that never received a response.
    pub fn unreachable(
        endpoint: Endpoint,
        error: impl Into<String>,
        elapsed: Duration,
        retries: usize,
    ) -> Self {
        Self {
            endpoint,
            result: AttemptResult::Unreachable {
                error: error.into(),
            },
            elapsed,
            retries,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.result, AttemptResult::Reachable { .. })
    }

    /// Status code, present only on success.
    pub fn status_code(&self) -> Option<u16> {
        match self.result {
            AttemptResult::Reachable { status_code } => Some(status_code),
            AttemptResult::Unreachable { .. } => None,
        }
    }

    /// Error description, present only on failure.
    pub fn error(&self) -> Option<&str> {
        match &self.result {
            AttemptResult::Reachable { .. } => None,
            AttemptResult::Unreachable { error } => Some(error),
        }
    }

    /// Elapsed time in whole milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Performs probe attempts against endpoints.
///
/// Implementations never fail: every error is folded into an unreachable
/// `ProbeAttempt`. They must be shareable across all concurrent orchestrations
/// of a run.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probes `endpoint` once, including the implementation's own retries.
    async fn probe(&self, endpoint: &Endpoint) -> ProbeAttempt;
}
