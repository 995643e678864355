//! Run finalization.
//!
//! This module contains the `finalize_run` function which stops the background
//! logger and turns the aggregate into the final report.

use crate::aggregate::RunAggregate;
use crate::app::{log_progress, log_run_statistics, shutdown_gracefully, ProgressCounter};
use crate::domain::CandidateBatch;

use super::{ProbeReport, RunLoopResult};

/// Input-side figures of a run, captured before the candidates were scheduled.
pub struct BatchStats {
    pub rows_read: usize,
    pub dropped: usize,
    pub scheduled: usize,
}

impl From<&CandidateBatch> for BatchStats {
    fn from(batch: &CandidateBatch) -> Self {
        Self {
            rows_read: batch.rows_read,
            dropped: batch.dropped,
            scheduled: batch.candidates.len(),
        }
    }
}

/// Finalize a run and produce the report.
///
/// This function performs the following finalization steps:
/// 1. Shut down the progress logging task
/// 2. Log final progress
/// 3. Build the summary from the aggregate
/// 4. Log run statistics
///
/// Must only be called once every domain task has finished or been aborted,
/// so the aggregate is final.
pub async fn finalize_run(
    aggregate: &RunAggregate,
    batch: &BatchStats,
    progress: &ProgressCounter,
    loop_result: RunLoopResult,
) -> ProbeReport {
    let RunLoopResult {
        cancelled,
        logging_cancel,
        logging_task,
    } = loop_result;

    shutdown_gracefully(logging_cancel, logging_task).await;
    log_progress(progress, batch.scheduled);

    let report = ProbeReport {
        summary: aggregate.finalize(batch.rows_read),
        dropped: batch.dropped,
        cancelled,
        elapsed_seconds: progress.elapsed().as_secs_f64(),
        completed_attempts: progress.completed_attempts(),
        attempts_per_second: progress.attempts_per_second(),
    };

    log_run_statistics(&report);
    report
}
