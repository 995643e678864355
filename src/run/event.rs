//! Per-domain progress events.

use serde::Serialize;

use crate::app::ProgressCounter;
use crate::domain::Protocol;
use crate::fallback::DomainOutcome;
use crate::probe::ProbeAttempt;

/// Terminal status of one protocol within a domain orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolStatus {
    Success,
    Failed,
    /// Never attempted because HTTP already answered
    Skipped,
}

impl ProtocolStatus {
    fn of(attempt: Option<&ProbeAttempt>) -> Self {
        match attempt {
            Some(attempt) if attempt.is_success() => ProtocolStatus::Success,
            Some(_) => ProtocolStatus::Failed,
            None => ProtocolStatus::Skipped,
        }
    }
}

/// Final status of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalStatus {
    Success,
    Failed,
}

/// One event per resolved domain, emitted in completion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    /// Position among the scheduled domains
    pub index: usize,
    /// Position in the raw input
    pub row: usize,
    pub domain: String,
    pub http_status: ProtocolStatus,
    pub https_status: ProtocolStatus,
    /// Response time of the answering protocol
    pub response_time_ms: Option<u64>,
    pub final_status: FinalStatus,
    pub protocol: Option<Protocol>,
    pub status_code: Option<u16>,
    pub http_error: Option<String>,
    pub https_error: Option<String>,
    /// Run-wide completed attempts when the event was emitted
    pub completed_attempts: usize,
    /// Average attempts per second since the run started
    pub attempts_per_second: f64,
}

impl DomainEvent {
    /// Builds the event for `outcome` with the current progress figures.
    pub fn new(outcome: &DomainOutcome, progress: &ProgressCounter) -> Self {
        Self {
            index: outcome.candidate.index,
            row: outcome.candidate.row,
            domain: outcome.candidate.host.clone(),
            http_status: ProtocolStatus::of(Some(&outcome.http)),
            https_status: ProtocolStatus::of(outcome.https.as_ref()),
            response_time_ms: outcome.response_time_ms(),
            final_status: if outcome.is_success() {
                FinalStatus::Success
            } else {
                FinalStatus::Failed
            },
            protocol: outcome.protocol(),
            status_code: outcome.status_code(),
            http_error: outcome.http.error().map(str::to_string),
            https_error: outcome
                .https
                .as_ref()
                .and_then(|a| a.error())
                .map(str::to_string),
            completed_attempts: progress.completed_attempts(),
            attempts_per_second: progress.attempts_per_second(),
        }
    }
}
