//! Run resources and per-task parameters.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::OwnedSemaphorePermit;
use tokio_util::sync::CancellationToken;

use crate::app::ProgressCounter;
use crate::domain::DomainCandidate;
use crate::fallback::DomainOutcome;
use crate::probe::Prober;

use super::DomainEvent;

/// Type alias for the per-domain event sink.
pub type EventCallback = Option<Arc<dyn Fn(DomainEvent) + Send + Sync>>;

/// Parameters for resolving a single domain.
///
/// This struct packages all the data needed by `process_domain_task`.
pub struct DomainTaskParams {
    /// The domain to resolve
    pub candidate: DomainCandidate,
    /// Shared prober (and with it the run's connection pool)
    pub prober: Arc<dyn Prober>,
    /// Semaphore permit (dropped when task completes)
    pub permit: OwnedSemaphorePermit,
    /// Run-wide progress counters
    pub progress: Arc<ProgressCounter>,
    /// Outcome stream into the aggregator
    pub outcomes: UnboundedSender<DomainOutcome>,
}

/// Result of the dispatch and drain phases.
///
/// Contains what finalization needs once no domain task is left running.
pub struct RunLoopResult {
    /// Whether cancellation cut the run short
    pub cancelled: bool,
    /// Cancellation token for the logging task
    pub logging_cancel: CancellationToken,
    /// Handle to the logging task
    pub logging_task: Option<tokio::task::JoinHandle<()>>,
}
