//! Two-stage protocol fallback for one domain.
//!
//! Every domain is probed over HTTP first. HTTPS is tried only after the HTTP
//! attempt failed, and never in parallel with it. The orchestration is an
//! explicit state machine that reaches `Resolved` exactly once, after one or
//! two probe calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use log::debug;

use crate::domain::{build_endpoint, DomainCandidate, Endpoint, Protocol};
use crate::error_handling::{ProbeError, ProbeErrorKind};
use crate::probe::{ProbeAttempt, Prober};

/// Final verdict for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One of the protocols got a response.
    Reachable {
        /// Protocol that answered
        protocol: Protocol,
        /// Status of the answering attempt
        status_code: u16,
        /// Elapsed time of the answering attempt
        response_time: Duration,
    },
    /// Neither protocol got a response.
    Unreachable {
        /// Failure description of the HTTP attempt
        http_error: String,
        /// Failure description of the HTTPS attempt, absent if it never ran
        https_error: Option<String>,
    },
}

/// The resolved result for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainOutcome {
    /// The candidate this outcome belongs to
    pub candidate: DomainCandidate,
    /// HTTP attempt, always made first
    pub http: ProbeAttempt,
    /// HTTPS attempt, present only when HTTP failed
    pub https: Option<ProbeAttempt>,
    /// Terminal resolution
    pub resolution: Resolution,
}

impl DomainOutcome {
    /// Builds the failure outcome for an orchestration that panicked, so the
    /// domain is still accounted for.
    pub fn aborted(candidate: DomainCandidate, reason: &str) -> Self {
        let error = ProbeError::network(ProbeErrorKind::Internal, reason).to_string();
        let http = ProbeAttempt::unreachable(
            Endpoint {
                protocol: Protocol::Http,
                host: candidate.host.clone(),
            },
            error.clone(),
            Duration::ZERO,
            0,
        );
        Self {
            candidate,
            http,
            https: None,
            resolution: Resolution::Unreachable {
                http_error: error,
                https_error: None,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.resolution, Resolution::Reachable { .. })
    }

    /// Protocol that answered.
    pub fn protocol(&self) -> Option<Protocol> {
        match self.resolution {
            Resolution::Reachable { protocol, .. } => Some(protocol),
            Resolution::Unreachable { .. } => None,
        }
    }

    /// Status code of the answering attempt.
    pub fn status_code(&self) -> Option<u16> {
        match self.resolution {
            Resolution::Reachable { status_code, .. } => Some(status_code),
            Resolution::Unreachable { .. } => None,
        }
    }

    /// Response time of the answering attempt in whole milliseconds.
    pub fn response_time_ms(&self) -> Option<u64> {
        match self.resolution {
            Resolution::Reachable { response_time, .. } => {
                Some(u64::try_from(response_time.as_millis()).unwrap_or(u64::MAX))
            }
            Resolution::Unreachable { .. } => None,
        }
    }

    /// The error a failed domain is classified by: the HTTP error when there is
    /// one, otherwise the HTTPS error.
    pub fn primary_error(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::Reachable { .. } => None,
            Resolution::Unreachable {
                http_error,
                https_error,
            } => {
                if http_error.is_empty() {
                    https_error.as_deref()
                } else {
                    Some(http_error)
                }
            }
        }
    }
}

enum FallbackState {
    HttpPending,
    HttpsPending {
        http: ProbeAttempt,
    },
    Resolved {
        http: ProbeAttempt,
        https: Option<ProbeAttempt>,
        resolution: Resolution,
    },
}

/// Drives the HTTP-then-HTTPS policy for one domain.
///
/// `attempts` is incremented once per probe call actually issued, which makes
/// it usable as the run-wide completed-attempt counter.
///
/// # Arguments
///
/// * `prober` - Probe implementation shared by the run
/// * `candidate` - The domain to resolve
/// * `attempts` - Run-wide completed-attempt counter
///
/// # Returns
///
/// The domain's outcome. This function never fails; probe failures are part of
/// the outcome.
pub async fn resolve_domain(
    prober: &dyn Prober,
    candidate: DomainCandidate,
    attempts: &AtomicUsize,
) -> DomainOutcome {
    let mut state = FallbackState::HttpPending;
    loop {
        state = match state {
            FallbackState::HttpPending => {
                let http = attempt(prober, &candidate.host, Protocol::Http, attempts).await;
                match http.status_code() {
                    Some(status_code) => {
                        let resolution = Resolution::Reachable {
                            protocol: Protocol::Http,
                            status_code,
                            response_time: http.elapsed,
                        };
                        FallbackState::Resolved {
                            http,
                            https: None,
                            resolution,
                        }
                    }
                    None => FallbackState::HttpsPending { http },
                }
            }
            FallbackState::HttpsPending { http } => {
                debug!("HTTP failed for {}, falling back to HTTPS", candidate.host);
                let https = attempt(prober, &candidate.host, Protocol::Https, attempts).await;
                let resolution = match https.status_code() {
                    Some(status_code) => Resolution::Reachable {
                        protocol: Protocol::Https,
                        status_code,
                        response_time: https.elapsed,
                    },
                    None => Resolution::Unreachable {
                        http_error: http.error().unwrap_or_default().to_string(),
                        https_error: https.error().map(str::to_string),
                    },
                };
                FallbackState::Resolved {
                    http,
                    https: Some(https),
                    resolution,
                }
            }
            FallbackState::Resolved {
                http,
                https,
                resolution,
            } => {
                return DomainOutcome {
                    candidate,
                    http,
                    https,
                    resolution,
                };
            }
        };
    }
}

async fn attempt(
    prober: &dyn Prober,
    host: &str,
    protocol: Protocol,
    attempts: &AtomicUsize,
) -> ProbeAttempt {
    match build_endpoint(host, protocol) {
        Some(endpoint) => {
            let result = prober.probe(&endpoint).await;
            attempts.fetch_add(1, Ordering::SeqCst);
            result
        }
        None => {
            let error =
                ProbeError::network(ProbeErrorKind::InvalidEndpoint, format!("rejected host {host:?}"));
            ProbeAttempt::unreachable(
                Endpoint {
                    protocol,
                    host: host.to_string(),
                },
                error.to_string(),
                Duration::ZERO,
                0,
            )
        }
    }
}
