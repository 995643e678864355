// Aggregation tests.

use super::*;
use crate::domain::{DomainCandidate, Endpoint};
use crate::probe::ProbeAttempt;
use std::sync::Arc;
use std::time::Duration;

fn candidate(index: usize, host: &str) -> DomainCandidate {
    DomainCandidate {
        index,
        row: index,
        original: host.to_string(),
        host: host.to_string(),
    }
}

fn endpoint(protocol: Protocol, host: &str) -> Endpoint {
    Endpoint {
        protocol,
        host: host.to_string(),
    }
}

fn http_success(index: usize, host: &str, status: u16, ms: u64) -> DomainOutcome {
    let elapsed = Duration::from_millis(ms);
    DomainOutcome {
        candidate: candidate(index, host),
        http: ProbeAttempt::reachable(endpoint(Protocol::Http, host), status, elapsed, 0),
        https: None,
        resolution: Resolution::Reachable {
            protocol: Protocol::Http,
            status_code: status,
            response_time: elapsed,
        },
    }
}

fn https_success(index: usize, host: &str, status: u16, ms: u64) -> DomainOutcome {
    let elapsed = Duration::from_millis(ms);
    DomainOutcome {
        candidate: candidate(index, host),
        http: ProbeAttempt::unreachable(
            endpoint(Protocol::Http, host),
            "Connection refused: closed",
            Duration::from_millis(3),
            1,
        ),
        https: Some(ProbeAttempt::reachable(
            endpoint(Protocol::Https, host),
            status,
            elapsed,
            0,
        )),
        resolution: Resolution::Reachable {
            protocol: Protocol::Https,
            status_code: status,
            response_time: elapsed,
        },
    }
}

fn failure(index: usize, host: &str, http_error: &str, https_error: &str) -> DomainOutcome {
    DomainOutcome {
        candidate: candidate(index, host),
        http: ProbeAttempt::unreachable(endpoint(Protocol::Http, host), http_error, Duration::ZERO, 0),
        https: Some(ProbeAttempt::unreachable(
            endpoint(Protocol::Https, host),
            https_error,
            Duration::ZERO,
            0,
        )),
        resolution: Resolution::Unreachable {
            http_error: http_error.to_string(),
            https_error: Some(https_error.to_string()),
        },
    }
}

/// 100 outcomes with a mix of protocols, statuses and error categories.
fn mixed_outcomes() -> Vec<DomainOutcome> {
    (0..100)
        .map(|i| {
            let host = format!("d{i}.example");
            match i % 5 {
                0 => http_success(i, &host, 200, 10 + i as u64),
                1 => http_success(i, &host, 404, 20 + i as u64),
                2 => https_success(i, &host, 301, 30 + i as u64),
                3 => failure(i, &host, "DNS resolution failed: nx", "DNS resolution failed: nx"),
                _ => failure(i, &host, "Request timeout: slow", "TLS handshake failed: cert"),
            }
        })
        .collect()
}

fn fold(outcomes: &[DomainOutcome]) -> RunAggregate {
    let mut aggregate = RunAggregate::new();
    for outcome in outcomes {
        aggregate.record(outcome);
    }
    aggregate
}

#[test]
fn test_error_pattern_takes_text_before_first_colon() {
    assert_eq!(error_pattern("Request timeout: after 30s: again"), "Request timeout");
    assert_eq!(error_pattern("no colon at all"), "no colon at all");
    assert_eq!(error_pattern(""), UNKNOWN_ERROR_PATTERN);
    assert_eq!(error_pattern(": leading colon"), UNKNOWN_ERROR_PATTERN);
}

#[test]
fn test_empty_stream_summary_is_all_zero() {
    let summary = RunAggregate::new().finalize(0);
    assert_eq!(summary.total_domains, 0);
    assert_eq!(summary.successful, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.success_rate, 0.0);
    assert_eq!(summary.failure_rate, 0.0);
    assert_eq!(summary.http_success_rate, 0.0);
    assert_eq!(summary.https_success_rate, 0.0);
    assert_eq!(summary.response_times, ResponseTimeStats::default());
    assert!(summary.top_status_codes.is_empty());
    assert!(summary.top_error_patterns.is_empty());
    assert!(summary.success_samples.is_empty());
    assert!(summary.failure_samples.is_empty());
}

#[test]
fn test_end_to_end_counts() {
    let mut aggregate = RunAggregate::new();
    aggregate.record(&http_success(0, "a.com", 200, 50));
    aggregate.record(&https_success(1, "bb.co", 200, 80));

    // Three rows were read; one was dropped before scheduling
    let summary = aggregate.finalize(3);
    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.http_success, 1);
    assert_eq!(summary.https_success, 1);
    assert_eq!(summary.success_rate, 66.7);
    assert_eq!(summary.http_success_rate, 33.3);
    assert_eq!(
        summary.response_times,
        ResponseTimeStats {
            min_ms: 50,
            avg_ms: 65,
            max_ms: 80
        }
    );
    assert_eq!(summary.top_status_codes.len(), 1);
    assert_eq!(summary.top_status_codes[0].status_code, 200);
    assert_eq!(summary.top_status_codes[0].count, 2);
    assert_eq!(summary.top_status_codes[0].percentage, 100.0);
}

#[test]
fn test_average_rounds_to_nearest_millisecond() {
    let mut aggregate = RunAggregate::new();
    aggregate.record(&http_success(0, "a.com", 200, 10));
    aggregate.record(&http_success(1, "b.com", 200, 11));
    // 10.5 rounds away from zero
    assert_eq!(aggregate.response_time_stats().avg_ms, 11);
}

#[test]
fn test_error_patterns_prefer_http_error() {
    let mut aggregate = RunAggregate::new();
    aggregate.record(&failure(0, "a.com", "Request timeout: x", "TLS handshake failed: y"));
    aggregate.record(&failure(1, "b.com", "Request timeout: x", "DNS resolution failed: z"));
    aggregate.record(&failure(2, "c.com", "Connection refused: x", "Connection refused: x"));

    let summary = aggregate.finalize(3);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.top_error_patterns[0].pattern, "Request timeout");
    assert_eq!(summary.top_error_patterns[0].count, 2);
    assert_eq!(summary.top_error_patterns[0].percentage, 66.7);
    assert_eq!(summary.top_error_patterns[1].pattern, "Connection refused");
    assert_eq!(summary.top_error_patterns.len(), 2);
}

#[test]
fn test_error_pattern_of_empty_http_error_uses_https_error() {
    let mut aggregate = RunAggregate::new();
    aggregate.record(&failure(0, "a.com", "", "TLS handshake failed: y"));
    let summary = aggregate.finalize(1);
    assert_eq!(summary.top_error_patterns[0].pattern, "TLS handshake failed");
}

#[test]
fn test_top_lists_are_capped_and_tie_broken() {
    let mut aggregate = RunAggregate::new();
    for (i, status) in (200..215u16).enumerate() {
        aggregate.record(&http_success(i, "a.com", status, 1));
    }
    for i in 0..8 {
        let error = format!("Category {i}: detail");
        aggregate.record(&failure(100 + i, "f.com", &error, &error));
    }

    let summary = aggregate.finalize(23);
    assert_eq!(summary.top_status_codes.len(), TOP_STATUS_CODES);
    // Equal counts order by status code ascending
    assert_eq!(summary.top_status_codes[0].status_code, 200);
    assert_eq!(summary.top_status_codes[9].status_code, 209);

    assert_eq!(summary.top_error_patterns.len(), TOP_ERROR_PATTERNS);
    assert_eq!(summary.top_error_patterns[0].pattern, "Category 0");
}

#[test]
fn test_samples_keep_lowest_indices() {
    let outcomes = mixed_outcomes();
    let summary = fold(&outcomes).finalize(100);

    assert_eq!(summary.success_samples.len(), SAMPLE_LIMIT);
    assert_eq!(summary.failure_samples.len(), SAMPLE_LIMIT);
    let success_indices: Vec<usize> = summary.success_samples.iter().map(|s| s.index).collect();
    assert_eq!(success_indices, vec![0, 1, 2, 5, 6, 7, 10, 11, 12, 15]);
    assert_eq!(summary.failure_samples[0].index, 3);
    assert_eq!(summary.failure_samples[0].domain, "d3.example");
}

#[test]
fn test_fold_is_order_insensitive() {
    let outcomes = mixed_outcomes();
    let forward = fold(&outcomes);

    let mut reversed = outcomes.clone();
    reversed.reverse();

    // Deterministic interleaving: odd positions first, then even
    let mut interleaved: Vec<DomainOutcome> = outcomes.iter().skip(1).step_by(2).cloned().collect();
    interleaved.extend(outcomes.iter().step_by(2).cloned());

    let mut rotated = outcomes.clone();
    rotated.rotate_left(37);

    for permutation in [reversed, interleaved, rotated] {
        let other = fold(&permutation);
        assert_eq!(other.finalize(100), forward.finalize(100));
        assert_eq!(other.successful(), 60);
        assert_eq!(other.failed(), 40);
    }
}

#[test]
fn test_merge_matches_single_fold() {
    let outcomes = mixed_outcomes();
    let (left, right) = outcomes.split_at(42);

    let mut merged = fold(right);
    merged.merge(fold(left));

    assert_eq!(merged.finalize(100), fold(&outcomes).finalize(100));
}

#[tokio::test]
async fn test_shared_aggregate_concurrent_writers() {
    let shared = Arc::new(SharedAggregate::new());
    let outcomes = mixed_outcomes();

    let mut handles = Vec::new();
    for chunk in outcomes.chunks(10) {
        let shared = Arc::clone(&shared);
        let chunk = chunk.to_vec();
        handles.push(tokio::spawn(async move {
            for outcome in &chunk {
                shared.record(outcome);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(shared.snapshot().total(), 100);
    let shared = Arc::try_unwrap(shared).unwrap();
    assert_eq!(shared.into_inner().finalize(100), fold(&outcomes).finalize(100));
}
