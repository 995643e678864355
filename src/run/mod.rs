//! Concurrent run scheduling.
//!
//! A run normalizes its input, then resolves every domain under a fixed
//! concurrency ceiling:
//! - a semaphore bounds the number of in-flight orchestrations
//! - each orchestration runs in its own task and reports through an unbounded
//!   channel
//! - a single consumer task folds outcomes into the run aggregate and emits
//!   one `DomainEvent` per domain
//!
//! Cancellation through `RunControl` stops dispatch immediately, lets running
//! orchestrations finish within the grace period and aborts whatever is left.

mod event;
mod finalize;
mod resources;
mod task;

pub use event::{DomainEvent, FinalStatus, ProtocolStatus};
pub use resources::EventCallback;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::aggregate::{RunAggregate, RunSummary};
use crate::app::{log_progress, ProgressCounter};
use crate::config::{Config, LOGGING_INTERVAL};
use crate::domain::prepare_candidates;
use crate::fallback::DomainOutcome;
use crate::initialization::init_semaphore;
use crate::probe::{HttpProber, Prober};

use finalize::{finalize_run, BatchStats};
use resources::{DomainTaskParams, RunLoopResult};
use task::process_domain_task;

/// Results of a probing run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// Aggregated statistics of every resolved domain
    #[serde(flatten)]
    pub summary: RunSummary,
    /// Input rows rejected by normalization
    pub dropped: usize,
    /// Whether cancellation cut the run short
    pub cancelled: bool,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
    /// HTTP and HTTPS probe calls that completed
    pub completed_attempts: usize,
    /// Average completed attempts per second
    pub attempts_per_second: f64,
}

/// External control over a running probe.
///
/// `cancel()` may be called from any task or thread, any number of times; only
/// the first call has an effect.
#[derive(Debug, Default)]
pub struct RunControl {
    token: CancellationToken,
    requested: AtomicBool,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests early termination.
    ///
    /// Returns `true` for the call that actually requested it and `false` for
    /// every later call.
    pub fn cancel(&self) -> bool {
        if self.requested.swap(true, Ordering::SeqCst) {
            return false;
        }
        info!("Cancellation requested, no new domains will be scheduled");
        self.token.cancel();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

/// Runs a probe over `raw` candidates with the reqwest-backed prober.
///
/// This is the main entry point for the library. The HTTP connection pool is
/// created here and released when the run ends.
///
/// # Arguments
///
/// * `config` - Run configuration (ceiling, timeout, retries, cap, ...)
/// * `raw` - Raw domain candidates in input order
/// * `control` - Cancellation handle
/// * `on_event` - Optional sink receiving one event per resolved domain
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the HTTP client cannot
/// be built. Probe failures never surface here; they are part of the report.
///
/// # Example
///
/// ```no_run
/// use domain_reach::{run_probe, Config, RunControl};
///
/// # async fn example() -> anyhow::Result<()> {
/// let control = RunControl::new();
/// let report = run_probe(&Config::default(), ["example.com"], &control, None).await?;
/// println!("{} reachable", report.summary.successful);
/// # Ok(())
/// # }
/// ```
pub async fn run_probe<I, T>(
    config: &Config,
    raw: I,
    control: &RunControl,
    on_event: EventCallback,
) -> Result<ProbeReport>
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    config.validate().context("Invalid configuration")?;
    let prober = HttpProber::new(config).context("Failed to initialize HTTP client")?;
    execute_run(Arc::new(prober), config, raw, control, on_event).await
}

/// Runs a probe with a caller-supplied `Prober`.
///
/// Identical to `run_probe` apart from where probe attempts go.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub async fn run_probe_with<I, T>(
    prober: Arc<dyn Prober>,
    config: &Config,
    raw: I,
    control: &RunControl,
    on_event: EventCallback,
) -> Result<ProbeReport>
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    config.validate().context("Invalid configuration")?;
    execute_run(prober, config, raw, control, on_event).await
}

async fn execute_run<I, T>(
    prober: Arc<dyn Prober>,
    config: &Config,
    raw: I,
    control: &RunControl,
    on_event: EventCallback,
) -> Result<ProbeReport>
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    let batch = prepare_candidates(raw, config.max_domains);
    let batch_stats = BatchStats::from(&batch);
    info!(
        "Scheduling {} domains from {} input rows ({} dropped), concurrency {}",
        batch_stats.scheduled, batch_stats.rows_read, batch_stats.dropped, config.max_concurrency
    );

    let progress = Arc::new(ProgressCounter::new());
    let semaphore = init_semaphore(config.max_concurrency);

    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
    let aggregator = tokio::spawn(consume_outcomes(
        outcome_rx,
        on_event,
        Arc::clone(&progress),
    ));

    let logging_cancel = CancellationToken::new();
    let logging_task = {
        let cancel_logging = logging_cancel.child_token();
        let progress = Arc::clone(&progress);
        let total_domains = batch_stats.scheduled;
        Some(tokio::task::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
            // The first tick completes immediately
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        log_progress(&progress, total_domains);
                    }
                    _ = cancel_logging.cancelled() => {
                        break;
                    }
                }
            }
        }))
    };

    let mut tasks: FuturesUnordered<JoinHandle<()>> = FuturesUnordered::new();
    let mut cancelled = false;

    'dispatch: for candidate in batch.candidates {
        let permit = loop {
            tokio::select! {
                biased;
                _ = control.cancelled() => {
                    cancelled = true;
                    break 'dispatch;
                }
                permit = Arc::clone(&semaphore).acquire_owned() => break permit,
                Some(joined) = tasks.next(), if !tasks.is_empty() => log_join_result(joined),
            }
        };
        let permit = match permit {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Semaphore closed, skipping domain: {}", candidate.host);
                continue;
            }
        };

        tasks.push(tokio::spawn(process_domain_task(DomainTaskParams {
            candidate,
            prober: Arc::clone(&prober),
            permit,
            progress: Arc::clone(&progress),
            outcomes: outcome_tx.clone(),
        })));
    }
    drop(outcome_tx);

    if !cancelled {
        tokio::select! {
            _ = drain(&mut tasks) => {}
            _ = control.cancelled() => cancelled = true,
        }
    }

    if cancelled && !tasks.is_empty() {
        let grace = config.cancel_grace();
        info!(
            "Waiting up to {:.1}s for in-flight domains to finish",
            grace.as_secs_f64()
        );
        if tokio::time::timeout(grace, drain(&mut tasks)).await.is_err() {
            warn!(
                "Grace period elapsed, aborting {} in-flight domains",
                tasks.len()
            );
            for task in tasks.iter() {
                task.abort();
            }
            drain(&mut tasks).await;
        }
    }

    // Every sender is gone now, so the consumer sees the end of the stream
    let aggregate = aggregator.await.context("Outcome aggregator failed")?;

    let loop_result = RunLoopResult {
        cancelled,
        logging_cancel,
        logging_task,
    };
    Ok(finalize_run(&aggregate, &batch_stats, &progress, loop_result).await)
}

/// The single writer of the run aggregate.
///
/// A panicking event sink loses that event only; the outcome is already
/// folded and the stream keeps being consumed.
async fn consume_outcomes(
    mut outcomes: UnboundedReceiver<DomainOutcome>,
    on_event: EventCallback,
    progress: Arc<ProgressCounter>,
) -> RunAggregate {
    let mut aggregate = RunAggregate::new();
    while let Some(outcome) = outcomes.recv().await {
        aggregate.record(&outcome);
        progress.record_domain();
        if let Some(callback) = &on_event {
            let event = DomainEvent::new(&outcome, &progress);
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(event))) {
                warn!(
                    "Event sink panicked for {}: {}",
                    outcome.candidate.host,
                    task::panic_message(panic.as_ref())
                );
            }
        }
    }
    aggregate
}

async fn drain(tasks: &mut FuturesUnordered<JoinHandle<()>>) {
    while let Some(joined) = tasks.next().await {
        log_join_result(joined);
    }
}

fn log_join_result(joined: Result<(), JoinError>) {
    match joined {
        Ok(()) => {}
        Err(e) if e.is_cancelled() => debug!("Domain task aborted"),
        Err(e) => warn!("Domain task failed: {:?}", e),
    }
}
