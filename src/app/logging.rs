//! Progress tracking and logging.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::info;

/// Run-wide progress counters.
///
/// `attempts` counts every HTTP or HTTPS probe call that completed and only
/// ever grows; `domains` counts resolved domains that reached the aggregator.
#[derive(Debug)]
pub struct ProgressCounter {
    start: Instant,
    attempts: AtomicUsize,
    domains: AtomicUsize,
}

impl ProgressCounter {
    /// Starts the clock.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            attempts: AtomicUsize::new(0),
            domains: AtomicUsize::new(0),
        }
    }

    /// The completed-attempt counter, incremented by the fallback orchestrator.
    pub fn attempt_counter(&self) -> &AtomicUsize {
        &self.attempts
    }

    pub fn completed_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn record_domain(&self) {
        self.domains.fetch_add(1, Ordering::SeqCst);
    }

    pub fn completed_domains(&self) -> usize {
        self.domains.load(Ordering::SeqCst)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Average completed attempts per second since the run started.
    pub fn attempts_per_second(&self) -> f64 {
        let elapsed_secs = self.elapsed().as_secs_f64();
        if elapsed_secs > 0.0 {
            self.completed_attempts() as f64 / elapsed_secs
        } else {
            0.0
        }
    }
}

impl Default for ProgressCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs progress information about the run.
///
/// # Arguments
///
/// * `progress` - Run-wide progress counters
/// * `total_domains` - Domains scheduled for the run
pub fn log_progress(progress: &ProgressCounter, total_domains: usize) {
    info!(
        "Resolved {}/{} domains, {} attempts in {:.2} seconds (~{:.2} attempts/sec)",
        progress.completed_domains(),
        total_domains,
        progress.completed_attempts(),
        progress.elapsed().as_secs_f64(),
        progress.attempts_per_second()
    );
}
