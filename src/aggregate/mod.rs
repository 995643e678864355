//! Run statistics aggregation.
//!
//! Domain outcomes are folded into a `RunAggregate` as they arrive. The fold is
//! commutative and associative: counts, histograms and the response-time
//! multiset do not depend on arrival order, and samples keep the lowest
//! candidate indices rather than the earliest arrivals.
//!
//! Key types:
//! - `RunAggregate` - Single-writer accumulator
//! - `SharedAggregate` - Mutex-guarded accumulator for concurrent writers
//! - `RunSummary` - Finalized, serializable report body

mod summary;

pub use summary::{
    percentage, ErrorPatternCount, FailureSample, ResponseTimeStats, RunSummary, StatusCodeCount,
    SuccessSample,
};

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::config::{SAMPLE_LIMIT, TOP_ERROR_PATTERNS, TOP_STATUS_CODES};
use crate::domain::Protocol;
use crate::fallback::{DomainOutcome, Resolution};

/// Pattern used when an error description has no leading token.
pub const UNKNOWN_ERROR_PATTERN: &str = "Unknown Error";

/// Leading token of an error description: the text before the first `:`.
///
/// This is a coarse grouping heuristic. Descriptions produced by the probe
/// client start with their category label, so the token is the category.
pub fn error_pattern(description: &str) -> &str {
    match description.split(':').next() {
        Some(token) if !token.is_empty() => token,
        _ => UNKNOWN_ERROR_PATTERN,
    }
}

/// Running statistics for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunAggregate {
    successful: usize,
    failed: usize,
    http_success: usize,
    https_success: usize,
    response_times: Vec<u64>,
    status_codes: HashMap<u16, usize>,
    error_patterns: HashMap<String, usize>,
    success_samples: Vec<SuccessSample>,
    failure_samples: Vec<FailureSample>,
}

impl RunAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one outcome into the aggregate.
    pub fn record(&mut self, outcome: &DomainOutcome) {
        let index = outcome.candidate.index;
        let domain = outcome.candidate.host.clone();

        match &outcome.resolution {
            Resolution::Reachable {
                protocol,
                status_code,
                ..
            } => {
                let response_time_ms = outcome.response_time_ms().unwrap_or_default();
                self.successful += 1;
                match protocol {
                    Protocol::Http => self.http_success += 1,
                    Protocol::Https => self.https_success += 1,
                }
                self.response_times.push(response_time_ms);
                *self.status_codes.entry(*status_code).or_insert(0) += 1;
                insert_sample(
                    &mut self.success_samples,
                    SuccessSample {
                        index,
                        domain,
                        protocol: *protocol,
                        status_code: *status_code,
                        response_time_ms,
                    },
                    |s| s.index,
                );
            }
            Resolution::Unreachable {
                http_error,
                https_error,
            } => {
                self.failed += 1;
                let pattern = error_pattern(outcome.primary_error().unwrap_or_default());
                *self.error_patterns.entry(pattern.to_string()).or_insert(0) += 1;
                insert_sample(
                    &mut self.failure_samples,
                    FailureSample {
                        index,
                        domain,
                        http_error: http_error.clone(),
                        https_error: https_error.clone(),
                    },
                    |s| s.index,
                );
            }
        }
    }

    /// Folds another aggregate into this one.
    pub fn merge(&mut self, other: RunAggregate) {
        self.successful += other.successful;
        self.failed += other.failed;
        self.http_success += other.http_success;
        self.https_success += other.https_success;
        self.response_times.extend(other.response_times);
        for (code, count) in other.status_codes {
            *self.status_codes.entry(code).or_insert(0) += count;
        }
        for (pattern, count) in other.error_patterns {
            *self.error_patterns.entry(pattern).or_insert(0) += count;
        }
        for sample in other.success_samples {
            insert_sample(&mut self.success_samples, sample, |s| s.index);
        }
        for sample in other.failure_samples {
            insert_sample(&mut self.failure_samples, sample, |s| s.index);
        }
    }

    /// Domains folded so far.
    pub fn total(&self) -> usize {
        self.successful + self.failed
    }

    pub fn successful(&self) -> usize {
        self.successful
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Min/avg/max of the recorded response times.
    pub fn response_time_stats(&self) -> ResponseTimeStats {
        let (Some(min_ms), Some(max_ms)) = (
            self.response_times.iter().min().copied(),
            self.response_times.iter().max().copied(),
        ) else {
            return ResponseTimeStats::default();
        };
        let sum: u128 = self.response_times.iter().map(|&t| u128::from(t)).sum();
        let avg_ms = (sum as f64 / self.response_times.len() as f64).round() as u64;
        ResponseTimeStats {
            min_ms,
            avg_ms,
            max_ms,
        }
    }

    /// Produces the summary.
    ///
    /// # Arguments
    ///
    /// * `total_rows` - Input rows read, the denominator of the rates
    pub fn finalize(&self, total_rows: usize) -> RunSummary {
        let mut status_codes: Vec<(u16, usize)> =
            self.status_codes.iter().map(|(&c, &n)| (c, n)).collect();
        status_codes.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let top_status_codes = status_codes
            .into_iter()
            .take(TOP_STATUS_CODES)
            .map(|(status_code, count)| StatusCodeCount {
                status_code,
                count,
                percentage: percentage(count, self.successful),
            })
            .collect();

        let mut patterns: Vec<(&String, usize)> =
            self.error_patterns.iter().map(|(p, &n)| (p, n)).collect();
        patterns.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        let top_error_patterns = patterns
            .into_iter()
            .take(TOP_ERROR_PATTERNS)
            .map(|(pattern, count)| ErrorPatternCount {
                pattern: pattern.clone(),
                count,
                percentage: percentage(count, self.failed),
            })
            .collect();

        RunSummary {
            total_rows,
            total_domains: self.total(),
            successful: self.successful,
            failed: self.failed,
            http_success: self.http_success,
            https_success: self.https_success,
            success_rate: percentage(self.successful, total_rows),
            failure_rate: percentage(self.failed, total_rows),
            http_success_rate: percentage(self.http_success, total_rows),
            https_success_rate: percentage(self.https_success, total_rows),
            response_times: self.response_time_stats(),
            top_status_codes,
            top_error_patterns,
            success_samples: self.success_samples.clone(),
            failure_samples: self.failure_samples.clone(),
        }
    }
}

/// Keeps the `SAMPLE_LIMIT` samples with the lowest candidate index.
fn insert_sample<T>(samples: &mut Vec<T>, sample: T, index: impl Fn(&T) -> usize) {
    let at = samples.partition_point(|s| index(s) < index(&sample));
    if at >= SAMPLE_LIMIT {
        return;
    }
    samples.insert(at, sample);
    samples.truncate(SAMPLE_LIMIT);
}

/// A `RunAggregate` that several tasks may write to.
///
/// Each `record` holds the lock for the whole fold of one outcome, so an
/// outcome is either fully counted or not at all.
#[derive(Debug, Default)]
pub struct SharedAggregate {
    inner: Mutex<RunAggregate>,
}

impl SharedAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: &DomainOutcome) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(outcome);
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> RunAggregate {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn into_inner(self) -> RunAggregate {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
