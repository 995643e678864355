//! Error handling and failure categorization.
//!
//! This module provides:
//! - Error type definitions (initialization, configuration, probe failures)
//! - Failure categorization of transport errors
//! - Retry strategy configuration
//!
//! Probe failures are split into:
//! - **Transient**: timeouts, refused/reset connections and retryable statuses,
//!   which earn another try
//! - **Terminal**: DNS, TLS, invalid endpoints and redirect loops, recorded
//!   immediately

mod categorization;
mod types;

// Re-export public API
pub use categorization::{
    categorize_reqwest_error, error_chain_message, get_retry_strategy, is_retryable_status,
};
pub use types::{InitializationError, ProbeError, ProbeErrorKind};
