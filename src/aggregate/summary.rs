//! Finalized run summary types.

use serde::Serialize;

use crate::domain::Protocol;

/// Min/avg/max over the response times of successful domains.
///
/// All fields are 0 when no domain succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeStats {
    pub min_ms: u64,
    /// Arithmetic mean rounded to the nearest millisecond
    pub avg_ms: u64,
    pub max_ms: u64,
}

/// One status-code histogram bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCodeCount {
    pub status_code: u16,
    pub count: usize,
    /// Share of successful domains, one decimal place
    pub percentage: f64,
}

/// One error-pattern histogram bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPatternCount {
    /// Text before the first `:` of the classifying error
    pub pattern: String,
    pub count: usize,
    /// Share of failed domains, one decimal place
    pub percentage: f64,
}

/// A successful domain kept for spot inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessSample {
    pub index: usize,
    pub domain: String,
    pub protocol: Protocol,
    pub status_code: u16,
    pub response_time_ms: u64,
}

/// A failed domain kept for spot inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureSample {
    pub index: usize,
    pub domain: String,
    pub http_error: String,
    pub https_error: Option<String>,
}

/// Structured summary of one run.
///
/// Rates are percentages of `total_rows` (every input row read, valid or not)
/// rounded to one decimal place. Every percentage is 0.0 when its denominator
/// is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Input rows read
    pub total_rows: usize,
    /// Domains that reached a resolution
    pub total_domains: usize,
    pub successful: usize,
    pub failed: usize,
    pub http_success: usize,
    pub https_success: usize,
    pub success_rate: f64,
    pub failure_rate: f64,
    pub http_success_rate: f64,
    pub https_success_rate: f64,
    pub response_times: ResponseTimeStats,
    /// Most frequent status codes, count descending
    pub top_status_codes: Vec<StatusCodeCount>,
    /// Most frequent error patterns, count descending
    pub top_error_patterns: Vec<ErrorPatternCount>,
    pub success_samples: Vec<SuccessSample>,
    pub failure_samples: Vec<FailureSample>,
}

/// `part` as a percentage of `whole`, one decimal place, 0.0 for an empty whole.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / whole as f64).round() / 10.0
}
