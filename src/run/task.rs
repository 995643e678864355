//! Per-domain task processing.
//!
//! Each scheduled domain runs in its own Tokio task. A panic inside the
//! orchestration is caught and turned into a failed outcome, so one domain can
//! never take down its siblings or the scheduler.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use log::{debug, warn};

use crate::fallback::{resolve_domain, DomainOutcome};

use super::resources::DomainTaskParams;

/// Process a single domain task.
///
/// Resolves the domain, then hands the outcome to the aggregator in one send.
/// A task aborted before that send contributes nothing to the run statistics.
///
/// # Arguments
///
/// * `params` - All parameters needed to resolve the domain
pub async fn process_domain_task(params: DomainTaskParams) {
    let DomainTaskParams {
        candidate,
        prober,
        permit: _permit, // Hold permit until task completes
        progress,
        outcomes,
    } = params;

    let fallback_candidate = candidate.clone();
    let resolution = resolve_domain(prober.as_ref(), candidate, progress.attempt_counter());

    let outcome = match AssertUnwindSafe(resolution).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            warn!(
                "Orchestration for {} panicked: {}",
                fallback_candidate.host, reason
            );
            DomainOutcome::aborted(fallback_candidate, &format!("orchestration panicked: {reason}"))
        }
    };

    if outcomes.send(outcome).is_err() {
        debug!("Outcome stream closed before a result could be recorded");
    }
}

/// Best-effort text of a panic payload.
pub(super) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_extracts_payload() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(payload.as_ref()), "owned boom");

        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
