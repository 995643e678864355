//! Run support utilities.
//!
//! This module provides progress tracking and logging, shutdown of background
//! tasks, and the end-of-run statistics log used by the scheduler.

pub mod logging;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use logging::{log_progress, ProgressCounter};
pub use shutdown::shutdown_gracefully;
pub use statistics::log_run_statistics;
