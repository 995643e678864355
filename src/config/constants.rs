//! Configuration constants.
//!
//! This module defines the constants used throughout the prober, including
//! defaults, retry timing, connection pool sizing and the retryable status set.

use std::time::Duration;

// constants (used as defaults)
/// Maximum concurrent domain orchestrations (semaphore limit)
pub const DEFAULT_MAX_CONCURRENCY: usize = 100;
/// Per-attempt timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Extra tries granted to a transient failure
pub const DEFAULT_RETRIES: usize = 1;
/// Seconds in-flight orchestrations get to finish after cancellation before
/// they are aborted
pub const DEFAULT_CANCEL_GRACE_SECS: u64 = 3;
/// Progress logging interval in seconds
pub const LOGGING_INTERVAL: u64 = 5;

/// Default User-Agent string for probe requests.
///
/// Every attempt in a run identifies itself with this fixed signature unless
/// `--user-agent` overrides it.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Redirect handling
/// Maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 10;

// Connection pool
/// How long an idle keep-alive connection stays in the pool
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
/// Idle connections kept per host
pub const POOL_MAX_IDLE_PER_HOST: usize = 5;
/// TCP keep-alive probe interval
pub const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

// Retry strategy
/// Base of the exponential backoff (delay = base^n * factor)
pub const RETRY_BACKOFF_BASE: u64 = 2;
/// Multiplier applied to the backoff, giving a 1s first delay
pub const RETRY_BACKOFF_FACTOR_MS: u64 = 500;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 10;

/// Response statuses that are retried before being accepted as the final answer.
pub const RETRYABLE_STATUS_CODES: &[u16] = &[408, 413, 429, 500, 502, 503, 504, 521, 522, 524];

// Summary shape
/// Number of status codes listed in the summary
pub const TOP_STATUS_CODES: usize = 10;
/// Number of error patterns listed in the summary
pub const TOP_ERROR_PATTERNS: usize = 5;
/// Number of successful and failed domains kept as samples
pub const SAMPLE_LIMIT: usize = 10;
