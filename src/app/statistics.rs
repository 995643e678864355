//! End-of-run statistics logging.

use log::info;

use crate::run::ProbeReport;

/// Logs the headline numbers of a finished run.
pub fn log_run_statistics(report: &ProbeReport) {
    let summary = &report.summary;

    info!(
        "Run statistics: rows={}, domains={}, successful={} ({:.1}%), failed={} ({:.1}%)",
        summary.total_rows,
        summary.total_domains,
        summary.successful,
        summary.success_rate,
        summary.failed,
        summary.failure_rate
    );
    info!(
        "Reachable over HTTP: {} ({:.1}%), over HTTPS only: {} ({:.1}%)",
        summary.http_success,
        summary.http_success_rate,
        summary.https_success,
        summary.https_success_rate
    );

    if summary.successful > 0 {
        let times = &summary.response_times;
        info!(
            "Response times: min={}ms avg={}ms max={}ms",
            times.min_ms, times.avg_ms, times.max_ms
        );
    }

    for entry in &summary.top_status_codes {
        info!(
            "   status {}: {} ({:.1}%)",
            entry.status_code, entry.count, entry.percentage
        );
    }
    for entry in &summary.top_error_patterns {
        info!(
            "   {}: {} ({:.1}%)",
            entry.pattern, entry.count, entry.percentage
        );
    }

    if report.cancelled {
        info!(
            "Run was cancelled; statistics cover the {} domains resolved before it stopped",
            summary.total_domains
        );
    }

    info!(
        "Completed {} attempts in {:.1}s (~{:.2} attempts/sec)",
        report.completed_attempts, report.elapsed_seconds, report.attempts_per_second
    );
}
